//! Validated store configuration and its builder.

// self
use crate::{_prelude::*, auth::SignatureAlgorithm, error::ConfigError};

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreDescriptorError {
	/// Server URL is mandatory.
	#[error("Missing server URL.")]
	MissingServerUrl,
	/// Only HTTP(S) servers are supported.
	#[error("Server URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Server URL that failed validation.
		url: String,
	},
	/// Server URL must not carry a query or fragment because routes are appended to it.
	#[error("Server URL must not contain a query or fragment: {url}.")]
	UnexpectedQuery {
		/// Server URL that failed validation.
		url: String,
	},
	/// Search path must be a single non-empty path segment.
	#[error("Search path `{path}` must be a single non-empty path segment.")]
	InvalidSearchPath {
		/// Search path that failed validation.
		path: String,
	},
}

/// Immutable configuration consumed by store sessions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDescriptor {
	/// Base URL every route is resolved against.
	pub server_url: Url,
	/// Path segment that prefixes search routes.
	#[serde(default = "default_search_path")]
	pub search_path: String,
	/// Digest used to sign requests.
	#[serde(default)]
	pub signature_algorithm: SignatureAlgorithm,
	/// Emit indented JSON bodies.
	#[serde(default)]
	pub pretty_print_json: bool,
}
impl StoreDescriptor {
	/// Default search path segment.
	pub const DEFAULT_SEARCH_PATH: &'static str = "search";

	/// Creates a new builder.
	pub fn builder() -> StoreDescriptorBuilder {
		StoreDescriptorBuilder::default()
	}

	/// Parses and validates a descriptor from JSON.
	pub fn from_json(raw: &str) -> Result<Self> {
		let mut deserializer = serde_json::Deserializer::from_str(raw);
		let descriptor: Self =
			serde_path_to_error::deserialize(&mut deserializer).map_err(Error::Decode)?;

		descriptor.validate().map_err(ConfigError::from)?;

		Ok(descriptor)
	}

	/// Resolves a route (e.g. `User/1`) against the server URL.
	///
	/// The server URL is treated as a directory even without a trailing slash, so
	/// `https://host/api` + `User/1` yields `https://host/api/User/1`.
	pub fn route<S>(&self, segments: &[S]) -> Result<Url, ConfigError>
	where
		S: AsRef<str>,
	{
		let mut route = self.server_url.clone();

		route
			.path_segments_mut()
			.map_err(|_| ConfigError::InvalidRoute {
				path: segments.iter().map(S::as_ref).collect::<Vec<_>>().join("/"),
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			})?
			.pop_if_empty()
			.extend(segments);

		Ok(route)
	}

	fn validate(&self) -> Result<(), StoreDescriptorError> {
		validate_server_url(&self.server_url)?;
		validate_search_path(&self.search_path)?;

		Ok(())
	}
}

/// Builder for [`StoreDescriptor`] values.
#[derive(Debug, Default)]
pub struct StoreDescriptorBuilder {
	/// Base URL every route is resolved against.
	pub server_url: Option<Url>,
	/// Optional search path override.
	pub search_path: Option<String>,
	/// Digest used to sign requests.
	pub signature_algorithm: SignatureAlgorithm,
	/// Emit indented JSON bodies.
	pub pretty_print_json: bool,
}
impl StoreDescriptorBuilder {
	/// Sets the server URL.
	pub fn server_url(mut self, url: Url) -> Self {
		self.server_url = Some(url);

		self
	}

	/// Overrides the search path segment (defaults to `search`).
	pub fn search_path(mut self, path: impl Into<String>) -> Self {
		self.search_path = Some(path.into());

		self
	}

	/// Overrides the signing digest.
	pub fn signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
		self.signature_algorithm = algorithm;

		self
	}

	/// Toggles pretty-printed JSON bodies.
	pub fn pretty_print_json(mut self, enabled: bool) -> Self {
		self.pretty_print_json = enabled;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<StoreDescriptor, StoreDescriptorError> {
		let server_url = self.server_url.ok_or(StoreDescriptorError::MissingServerUrl)?;
		let descriptor = StoreDescriptor {
			server_url,
			search_path: self.search_path.unwrap_or_else(default_search_path),
			signature_algorithm: self.signature_algorithm,
			pretty_print_json: self.pretty_print_json,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

fn default_search_path() -> String {
	StoreDescriptor::DEFAULT_SEARCH_PATH.into()
}

fn validate_server_url(url: &Url) -> Result<(), StoreDescriptorError> {
	if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
		return Err(StoreDescriptorError::UnsupportedScheme { url: url.to_string() });
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(StoreDescriptorError::UnexpectedQuery { url: url.to_string() });
	}

	Ok(())
}

fn validate_search_path(path: &str) -> Result<(), StoreDescriptorError> {
	if path.is_empty() || path.contains('/') || path.chars().any(char::is_whitespace) {
		Err(StoreDescriptorError::InvalidSearchPath { path: path.to_owned() })
	} else {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Fixture URL should parse.")
	}

	#[test]
	fn builder_applies_defaults() {
		let descriptor = StoreDescriptor::builder()
			.server_url(url("https://store.example.com"))
			.build()
			.expect("Descriptor with only a server URL should build.");

		assert_eq!(descriptor.search_path, "search");
		assert_eq!(descriptor.signature_algorithm, SignatureAlgorithm::HmacSha256);
		assert!(!descriptor.pretty_print_json);
	}

	#[test]
	fn builder_rejects_invalid_configuration() {
		assert_eq!(
			StoreDescriptor::builder().build(),
			Err(StoreDescriptorError::MissingServerUrl)
		);
		assert!(matches!(
			StoreDescriptor::builder().server_url(url("ftp://store.example.com")).build(),
			Err(StoreDescriptorError::UnsupportedScheme { .. })
		));
		assert!(matches!(
			StoreDescriptor::builder().server_url(url("https://store.example.com/?a=1")).build(),
			Err(StoreDescriptorError::UnexpectedQuery { .. })
		));
		assert!(matches!(
			StoreDescriptor::builder()
				.server_url(url("https://store.example.com"))
				.search_path("find/all")
				.build(),
			Err(StoreDescriptorError::InvalidSearchPath { .. })
		));
	}

	#[test]
	fn route_appends_segments_to_server_path() {
		let root = StoreDescriptor::builder()
			.server_url(url("https://store.example.com"))
			.build()
			.expect("Root descriptor should build.");
		let nested = StoreDescriptor::builder()
			.server_url(url("https://store.example.com/api"))
			.build()
			.expect("Nested descriptor should build.");
		let slashed = StoreDescriptor::builder()
			.server_url(url("https://store.example.com/api/"))
			.build()
			.expect("Slashed descriptor should build.");

		assert_eq!(
			root.route(&["User", "1"]).expect("Route should resolve.").as_str(),
			"https://store.example.com/User/1"
		);
		assert_eq!(
			nested.route(&["User", "1"]).expect("Route should resolve.").as_str(),
			"https://store.example.com/api/User/1"
		);
		assert_eq!(
			slashed.route(&["search", "User"]).expect("Route should resolve.").path(),
			"/api/search/User"
		);
	}

	#[test]
	fn from_json_fills_defaults_and_validates() {
		let descriptor = StoreDescriptor::from_json(
			r#"{"server_url":"https://store.example.com","signature_algorithm":"hmac_sha512"}"#,
		)
		.expect("JSON descriptor should load.");

		assert_eq!(descriptor.search_path, "search");
		assert_eq!(descriptor.signature_algorithm, SignatureAlgorithm::HmacSha512);

		let err = StoreDescriptor::from_json(r#"{"server_url":"ftp://store.example.com"}"#)
			.expect_err("Unsupported schemes must be rejected.");

		assert!(matches!(
			err,
			Error::Config(ConfigError::Descriptor(StoreDescriptorError::UnsupportedScheme { .. }))
		));
	}
}
