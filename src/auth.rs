//! Credentials, authentication contexts, token derivation, request signing, and verification.

pub mod authenticator;
pub mod clock;
pub mod context;
pub mod credentials;
pub mod date;
pub mod token;
pub mod verify;

pub use authenticator::*;
pub use clock::*;
pub use context::*;
pub use credentials::*;
pub use token::*;
pub use verify::*;
