//! Request signing contracts that let callers swap the authenticator used by a store
//! session.

/// Describes how to attach authentication state to an outbound request without
/// constraining the request type.
///
/// The trait is generic over both the request and error types so a signer can target
/// [`StoreRequest`](crate::http::StoreRequest) or a transport's native request type.
/// Implementations must leave `request` untouched and return a signed copy, so callers can
/// replay the original.
pub trait RequestSigner<Request, Error>
where
	Self: Send + Sync,
{
	/// Returns a signed copy of `request`.
	fn sign(&self, request: &Request) -> Result<Request, Error>;
}
