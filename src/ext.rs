//! Public extension contracts for plugging custom signers into a store session.

pub mod request_signer;

pub use request_signer::*;
