//! Token derivation primitives.
//!
//! [`TokenGenerator`] is the replaceable primitive that turns [`Credentials`] plus an
//! [`AuthenticationContext`] into an [`AuthToken`]. The bundled [`HmacTokenGenerator`]
//! keys an HMAC with `SHA-256("<username>:<password>")`, signs the canonical context
//! string, and emits `<username>:<base64 signature>`.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac, digest::KeyInit};
use sha2::{Digest, Sha256, Sha512};
use subtle::ConstantTimeEq;
// self
use crate::{
	_prelude::*,
	auth::{AuthenticationContext, Credentials},
};

type HmacSha256 = Hmac<Sha256>;
type HmacSha512 = Hmac<Sha512>;

/// Value sent in the `Authorization` header.
///
/// Tokens are short-lived and bound to one request, but they still prove possession of the
/// password, so formatting redacts the signature.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);
impl AuthToken {
	/// Wraps a raw token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the raw header value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Splits the token into its username and signature halves.
	pub fn split(&self) -> Option<(&str, &str)> {
		self.0.split_once(':')
	}
}
impl AsRef<str> for AuthToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AuthToken").field(&"<redacted>").finish()
	}
}
impl Display for AuthToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Derives a token from credentials and a per-request context.
///
/// Implementations must be deterministic: the same inputs always produce the same token.
pub trait TokenGenerator
where
	Self: Send + Sync,
{
	/// Produces the token for the given credentials + context.
	fn generate(&self, credentials: &Credentials, context: &AuthenticationContext) -> AuthToken;

	/// Checks a presented token against the expected derivation.
	///
	/// The default implementation regenerates the token and compares the bytes in constant
	/// time.
	fn verify(
		&self,
		credentials: &Credentials,
		context: &AuthenticationContext,
		presented: &str,
	) -> bool {
		let expected = self.generate(credentials, context);

		expected.expose().as_bytes().ct_eq(presented.as_bytes()).into()
	}
}

/// Digest used by [`HmacTokenGenerator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureAlgorithm {
	#[default]
	/// HMAC-SHA256.
	HmacSha256,
	/// HMAC-SHA512.
	HmacSha512,
}
impl SignatureAlgorithm {
	/// Returns a stable label suitable for logs and configuration files.
	pub const fn as_str(self) -> &'static str {
		match self {
			SignatureAlgorithm::HmacSha256 => "hmac_sha256",
			SignatureAlgorithm::HmacSha512 => "hmac_sha512",
		}
	}
}
impl Display for SignatureAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Default HMAC-based [`TokenGenerator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HmacTokenGenerator {
	/// Digest used to sign the canonical string.
	pub algorithm: SignatureAlgorithm,
}
impl HmacTokenGenerator {
	/// Creates a generator for the given digest.
	pub const fn new(algorithm: SignatureAlgorithm) -> Self {
		Self { algorithm }
	}

	/// Returns the raw signature bytes over the context's canonical string.
	pub fn signature(&self, credentials: &Credentials, context: &AuthenticationContext) -> Vec<u8> {
		let key = signing_key(credentials);
		let message = context.canonical();

		match self.algorithm {
			SignatureAlgorithm::HmacSha256 => mac::<HmacSha256>(&key, message.as_bytes()),
			SignatureAlgorithm::HmacSha512 => mac::<HmacSha512>(&key, message.as_bytes()),
		}
	}
}
impl TokenGenerator for HmacTokenGenerator {
	fn generate(&self, credentials: &Credentials, context: &AuthenticationContext) -> AuthToken {
		let signature = STANDARD.encode(self.signature(credentials, context));

		AuthToken(format!("{}:{signature}", credentials.username))
	}

	fn verify(
		&self,
		credentials: &Credentials,
		context: &AuthenticationContext,
		presented: &str,
	) -> bool {
		let Some((username, encoded)) = presented.split_once(':') else {
			return false;
		};

		if username != &*credentials.username {
			return false;
		}

		let Ok(signature) = STANDARD.decode(encoded) else {
			return false;
		};
		let key = signing_key(credentials);
		let message = context.canonical();

		match self.algorithm {
			SignatureAlgorithm::HmacSha256 =>
				verify_mac::<HmacSha256>(&key, message.as_bytes(), &signature),
			SignatureAlgorithm::HmacSha512 =>
				verify_mac::<HmacSha512>(&key, message.as_bytes(), &signature),
		}
	}
}

fn signing_key(credentials: &Credentials) -> [u8; 32] {
	let mut hasher = Sha256::new();

	hasher.update(credentials.username.as_bytes());
	hasher.update(b":");
	hasher.update(credentials.password.expose().as_bytes());

	hasher.finalize().into()
}

fn keyed<M>(key: &[u8]) -> M
where
	M: Mac + KeyInit,
{
	match <M as KeyInit>::new_from_slice(key) {
		Ok(mac) => mac,
		Err(_) => unreachable!("HMAC accepts keys of any length"),
	}
}

fn mac<M>(key: &[u8], message: &[u8]) -> Vec<u8>
where
	M: Mac + KeyInit,
{
	let mut mac = keyed::<M>(key);

	mac.update(message);

	mac.finalize().into_bytes().to_vec()
}

fn verify_mac<M>(key: &[u8], message: &[u8], signature: &[u8]) -> bool
where
	M: Mac + KeyInit,
{
	let mut mac = keyed::<M>(key);

	mac.update(message);

	mac.verify_slice(signature).is_ok()
}
