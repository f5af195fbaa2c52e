//! Crate-level error types shared by the authenticator, the store decorator, and transports.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The outgoing request could not be signed.
	#[error(transparent)]
	MalformedRequest(#[from] MalformedRequestError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Server answered with a non-success status.
	#[error("Store responded with HTTP status {status}.")]
	Status {
		/// HTTP status code returned by the server.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: Vec<u8>,
	},
	/// Operation payload could not be encoded as JSON.
	#[error("Operation payload could not be encoded.")]
	Payload(#[source] serde_json::Error),
	/// Response body could not be decoded into the requested type.
	#[error("Response body could not be decoded.")]
	Decode(#[source] serde_path_to_error::Error<serde_json::Error>),
}
impl Error {
	/// Builds a status error from a code and body.
	pub fn status(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self::Status { status, body: body.into() }
	}
}

/// Raised when an outgoing request lacks the pieces required for signing.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MalformedRequestError {
	/// Request has no HTTP verb.
	#[error("Request is missing its HTTP verb.")]
	MissingVerb,
	/// Request has no URL, or its URL cannot carry a path.
	#[error("Request is missing its URL path.")]
	MissingPath,
	/// A computed header value is not valid for HTTP.
	#[error("The {header} header value is not a valid HTTP header value.")]
	InvalidHeaderValue {
		/// Header that failed validation.
		header: &'static str,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Store descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::store::StoreDescriptorError),
	/// Credentials failed validation.
	#[error(transparent)]
	Credentials(#[from] crate::auth::CredentialsError),
	/// A request URL could not be derived from the server URL.
	#[error("Request URL could not be built from `{path}`.")]
	InvalidRoute {
		/// Relative route that failed to join.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the store.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the store.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn malformed_request_converts_with_transparent_message() {
		let error: Error = MalformedRequestError::MissingVerb.into();

		assert!(matches!(error, Error::MalformedRequest(MalformedRequestError::MissingVerb)));
		assert_eq!(error.to_string(), "Request is missing its HTTP verb.");
	}

	#[test]
	fn status_error_keeps_body() {
		let error = Error::status(401, "denied");

		match error {
			Error::Status { status, body } => {
				assert_eq!(status, 401);
				assert_eq!(body, b"denied");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn transport_error_exposes_source() {
		let io = std::io::Error::other("socket closed");
		let error: Error = TransportError::network(io).into();
		let source =
			StdError::source(&error).expect("Transport error should expose the network error.");

		assert_eq!(source.to_string(), "socket closed");
	}
}
