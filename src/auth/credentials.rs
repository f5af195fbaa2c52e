//! Session credentials with a validated username and a redacted password.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

const USERNAME_MAX_LEN: usize = 128;

/// Error returned when credential validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum CredentialsError {
	/// The username was empty.
	#[error("Username cannot be empty.")]
	EmptyUsername,
	/// The username contains whitespace characters.
	#[error("Username contains whitespace.")]
	UsernameContainsWhitespace,
	/// The username contains the token separator.
	#[error("Username cannot contain `:`.")]
	UsernameContainsSeparator,
	/// The username contains characters that cannot travel in an HTTP header.
	#[error("Username must contain only visible ASCII characters.")]
	UsernameNotVisibleAscii,
	/// The username exceeded the allowed length.
	#[error("Username exceeds {max} characters.")]
	UsernameTooLong {
		/// Maximum permitted length.
		max: usize,
	},
	/// The password was empty.
	#[error("Password cannot be empty.")]
	EmptyPassword,
}

/// Validated account name that identifies the signer inside every token.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);
impl Username {
	/// Creates a new username after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, CredentialsError> {
		let view = value.as_ref();

		validate_username(view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for Username {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for Username {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Username> for String {
	fn from(value: Username) -> Self {
		value.0
	}
}
impl TryFrom<String> for Username {
	type Error = CredentialsError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_username(&value)?;

		Ok(Self(value))
	}
}
impl Debug for Username {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Username({})", self.0)
	}
}
impl Display for Username {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for Username {
	type Err = CredentialsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

/// Redacted password wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);
impl Password {
	/// Wraps a new password.
	pub fn new(value: impl Into<String>) -> Result<Self, CredentialsError> {
		let value = value.into();

		if value.is_empty() {
			return Err(CredentialsError::EmptyPassword);
		}

		Ok(Self(value))
	}

	/// Returns the inner password. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Password").field(&"<redacted>").finish()
	}
}
impl Display for Password {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Username and password held by a session for its whole lifetime.
///
/// Credentials are immutable once built and are shared across in-flight requests without
/// locking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Account name embedded in every token.
	pub username: Username,
	/// Secret used to derive the signing key.
	pub password: Password,
}
impl Credentials {
	/// Validates and wraps the provided username/password pair.
	pub fn new(
		username: impl AsRef<str>,
		password: impl Into<String>,
	) -> Result<Self, CredentialsError> {
		Ok(Self { username: Username::new(username)?, password: Password::new(password)? })
	}
}

fn validate_username(view: &str) -> Result<(), CredentialsError> {
	if view.is_empty() {
		return Err(CredentialsError::EmptyUsername);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(CredentialsError::UsernameContainsWhitespace);
	}
	if view.contains(':') {
		return Err(CredentialsError::UsernameContainsSeparator);
	}
	if !view.bytes().all(|byte| byte.is_ascii_graphic()) {
		return Err(CredentialsError::UsernameNotVisibleAscii);
	}
	if view.len() > USERNAME_MAX_LEN {
		return Err(CredentialsError::UsernameTooLong { max: USERNAME_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn username_rejects_whitespace_and_separator() {
		assert_eq!(Username::new(""), Err(CredentialsError::EmptyUsername));
		assert_eq!(Username::new(" alice"), Err(CredentialsError::UsernameContainsWhitespace));
		assert_eq!(Username::new("al:ice"), Err(CredentialsError::UsernameContainsSeparator));
		assert_eq!(
			Username::new("a".repeat(USERNAME_MAX_LEN + 1)),
			Err(CredentialsError::UsernameTooLong { max: USERNAME_MAX_LEN })
		);

		let exact = "a".repeat(USERNAME_MAX_LEN);

		Username::new(&exact).expect("Exact length should succeed.");
	}

	#[test]
	fn username_rejects_non_header_characters() {
		assert_eq!(Username::new("ålice"), Err(CredentialsError::UsernameNotVisibleAscii));
		assert_eq!(Username::new("bo\u{1}b"), Err(CredentialsError::UsernameNotVisibleAscii));
		assert_eq!(
			Credentials::new("ålice", "pw"),
			Err(CredentialsError::UsernameNotVisibleAscii)
		);

		Username::new("alice.o'neil+ops@example.com").expect("Visible ASCII should succeed.");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let username: Username =
			serde_json::from_str("\"alice\"").expect("Username should deserialize successfully.");

		assert_eq!(username.as_ref(), "alice");
		assert!(serde_json::from_str::<Username>("\"with space\"").is_err());
		assert_eq!(
			serde_json::to_string(&username).expect("Username should serialize."),
			"\"alice\""
		);
	}

	#[test]
	fn password_formatters_redact() {
		let credentials =
			Credentials::new("alice", "super-secret").expect("Credential fixture should be valid.");

		assert_eq!(format!("{:?}", credentials.password), "Password(\"<redacted>\")");
		assert_eq!(format!("{}", credentials.password), "<redacted>");
		assert!(!format!("{credentials:?}").contains("super-secret"));
		assert_eq!(Credentials::new("alice", ""), Err(CredentialsError::EmptyPassword));
	}
}
