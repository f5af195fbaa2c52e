//! Transport-neutral request and response values exchanged with a networked store.
//!
//! [`StoreRequest`] mirrors what a store framework hands to its request-builder hook: an
//! optional verb, an optional URL, headers, and a body. Both the verb and the URL are
//! optional because upstream builders are not trusted to fill them; the authenticator
//! rejects incomplete requests instead of guessing. [`StoreResponse`] is what the store's
//! send hook returns on success.

pub use ::http::{
	HeaderMap, HeaderName, HeaderValue, Method,
	header::{AUTHORIZATION, CONTENT_TYPE, DATE},
};

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Outgoing request descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreRequest {
	/// HTTP verb, when the builder supplied one.
	pub method: Option<Method>,
	/// Absolute request URL, when the builder supplied one.
	pub url: Option<Url>,
	/// Request headers.
	pub headers: HeaderMap,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
}
impl StoreRequest {
	/// Creates a request with the given verb and URL and no headers or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method: Some(method), url: Some(url), ..Default::default() }
	}

	/// Adds or replaces a header.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Sets the raw body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Returns the URL path as sent on the wire, excluding query and fragment.
	///
	/// URLs that cannot be a base (`mailto:`, `data:`) have no hierarchical path and yield
	/// `None`.
	pub fn path(&self) -> Option<&str> {
		self.url.as_ref().filter(|url| !url.cannot_be_a_base()).map(Url::path)
	}

	/// Returns a header value as a string slice if it is present and visible ASCII.
	pub fn header(&self, name: &HeaderName) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

/// Successful response returned by a store's send hook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl StoreResponse {
	/// Creates a response with an empty body.
	pub fn new(status: u16) -> Self {
		Self { status, ..Default::default() }
	}

	/// Sets the raw body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = body.into();

		self
	}

	/// Decodes the body as JSON, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer).map_err(Error::Decode)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn path_excludes_query_and_fragment() {
		let url = Url::parse("https://store.example.com/Users/1?expand=true#top")
			.expect("Fixture URL should parse.");
		let request = StoreRequest::new(Method::GET, url);

		assert_eq!(request.path(), Some("/Users/1"));
	}

	#[test]
	fn path_is_absent_without_hierarchical_url() {
		let url = Url::parse("mailto:admin@example.com").expect("Fixture URL should parse.");
		let request = StoreRequest::new(Method::GET, url);

		assert_eq!(request.path(), None);
		assert_eq!(StoreRequest::default().path(), None);
	}

	#[test]
	fn json_reports_failing_path() {
		#[derive(Debug, Deserialize)]
		#[allow(dead_code)]
		struct User {
			id: u64,
		}

		let response = StoreResponse::new(200).with_body(r#"{"id":"not-a-number"}"#);
		let err = response.json::<User>().expect_err("String id must not decode as u64.");

		match err {
			Error::Decode(inner) => assert_eq!(inner.path().to_string(), "id"),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
