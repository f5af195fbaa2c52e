//! The `{verb, path, date}` tuple that every token signs.

// self
use crate::_prelude::*;

/// Per-request authentication context.
///
/// Built fresh for every outgoing request and discarded once the token exists. The `date`
/// must be the exact string later sent in the `Date` header so the server can rebuild the
/// same canonical string.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AuthenticationContext {
	/// HTTP verb, e.g. `GET`.
	pub verb: String,
	/// URL path without query or fragment, e.g. `/Users/1`.
	pub path: String,
	/// Formatted HTTP-date.
	pub date: String,
}
impl AuthenticationContext {
	/// Creates a new context.
	pub fn new(verb: impl Into<String>, path: impl Into<String>, date: impl Into<String>) -> Self {
		Self { verb: verb.into(), path: path.into(), date: date.into() }
	}

	/// Returns the canonical string fed to the token generator: verb, path, and date
	/// concatenated without separators.
	pub fn canonical(&self) -> String {
		let mut buf = String::with_capacity(self.verb.len() + self.path.len() + self.date.len());

		buf.push_str(&self.verb);
		buf.push_str(&self.path);
		buf.push_str(&self.date);

		buf
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn canonical_concatenates_without_separators() {
		let context =
			AuthenticationContext::new("GET", "/Users/1", "Thu, 04 Jun 2015 00:00:00 GMT");

		assert_eq!(context.canonical(), "GET/Users/1Thu, 04 Jun 2015 00:00:00 GMT");
	}
}
