//! Store contracts, the authenticated decorator, and the built-in reqwest store.
//!
//! A [`NetworkStore`] models the external object-store framework through its two hooks:
//! [`build_request`](NetworkStore::build_request) turns a [`StoreOperation`] into a
//! [`StoreRequest`], and [`send`](NetworkStore::send) executes it. [`AuthenticatedStore`]
//! wraps any store, signs every request it builds, and raises an unauthorized event when a
//! result carries HTTP 401.

pub mod authenticated;
pub mod descriptor;
#[cfg(feature = "reqwest")] pub mod rest;

pub use authenticated::AuthenticatedStore;
pub use descriptor::*;
#[cfg(feature = "reqwest")] pub use rest::HttpStore;

// crates.io
use serde_json::{Map, Value};
// self
use crate::{
	_prelude::*,
	http::{StoreRequest, StoreResponse},
	obs::OperationKind,
};

/// Boxed future returned by [`NetworkStore::send`].
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// JSON object payload attached to searches, creates, edits, and function calls.
pub type JsonObject = Map<String, Value>;

/// Request-builder and send hooks of a networked object store.
pub trait NetworkStore
where
	Self: Send + Sync,
{
	/// Builds the outgoing request for `operation`.
	fn build_request(&self, operation: &StoreOperation) -> Result<StoreRequest>;

	/// Sends a request previously built for `operation`.
	fn send<'a>(
		&'a self,
		operation: &'a StoreOperation,
		request: StoreRequest,
	) -> StoreFuture<'a, StoreResponse>;

	/// Builds and sends the request for `operation`.
	fn perform<'a>(&'a self, operation: &'a StoreOperation) -> StoreFuture<'a, StoreResponse> {
		Box::pin(async move {
			let request = self.build_request(operation)?;

			self.send(operation, request).await
		})
	}
}
impl<S> NetworkStore for Arc<S>
where
	S: ?Sized + NetworkStore,
{
	fn build_request(&self, operation: &StoreOperation) -> Result<StoreRequest> {
		S::build_request(self, operation)
	}

	fn send<'a>(
		&'a self,
		operation: &'a StoreOperation,
		request: StoreRequest,
	) -> StoreFuture<'a, StoreResponse> {
		S::send(self, operation, request)
	}

	fn perform<'a>(&'a self, operation: &'a StoreOperation) -> StoreFuture<'a, StoreResponse> {
		S::perform(self, operation)
	}
}

/// Network operation issued against a store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreOperation {
	/// Searches an entity with filter parameters.
	Search {
		/// Entity name.
		entity: String,
		/// Search parameters understood by the server.
		parameters: JsonObject,
	},
	/// Fetches a single resource.
	Fetch {
		/// Entity name.
		entity: String,
		/// Resource identifier.
		id: u64,
	},
	/// Creates a resource.
	Create {
		/// Entity name.
		entity: String,
		/// Optional initial attribute values.
		initial_values: Option<JsonObject>,
	},
	/// Edits a resource.
	Edit {
		/// Entity name.
		entity: String,
		/// Resource identifier.
		id: u64,
		/// Attribute changes.
		changes: JsonObject,
	},
	/// Deletes a resource.
	Delete {
		/// Entity name.
		entity: String,
		/// Resource identifier.
		id: u64,
	},
	/// Invokes a server-side function on a resource.
	PerformFunction {
		/// Entity name.
		entity: String,
		/// Resource identifier.
		id: u64,
		/// Function name.
		function: String,
		/// Optional JSON argument.
		payload: Option<JsonObject>,
	},
}
impl StoreOperation {
	/// Returns the operation kind used for events, spans, and metrics.
	pub fn kind(&self) -> OperationKind {
		match self {
			Self::Search { .. } => OperationKind::Search,
			Self::Fetch { .. } => OperationKind::Fetch,
			Self::Create { .. } => OperationKind::Create,
			Self::Edit { .. } => OperationKind::Edit,
			Self::Delete { .. } => OperationKind::Delete,
			Self::PerformFunction { .. } => OperationKind::PerformFunction,
		}
	}

	/// Returns the entity the operation targets.
	pub fn entity(&self) -> &str {
		match self {
			Self::Search { entity, .. }
			| Self::Fetch { entity, .. }
			| Self::Create { entity, .. }
			| Self::Edit { entity, .. }
			| Self::Delete { entity, .. }
			| Self::PerformFunction { entity, .. } => entity,
		}
	}
}

/// Extracts the HTTP status carried by an operation result.
///
/// The authenticated decorator uses this single extractor for every operation kind, so a
/// store only has to surface statuses consistently for the unauthorized check to apply
/// everywhere.
pub trait ResponseStatus {
	/// Returns the HTTP status, if the value carries one.
	fn response_status(&self) -> Option<u16>;

	/// Returns `true` when the status reports rejected credentials.
	fn is_unauthorized(&self) -> bool {
		self.response_status() == Some(crate::notify::UnauthorizedEvent::STATUS)
	}
}
impl ResponseStatus for StoreResponse {
	fn response_status(&self) -> Option<u16> {
		Some(self.status)
	}
}
impl ResponseStatus for Error {
	fn response_status(&self) -> Option<u16> {
		match self {
			Error::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}
impl<T, E> ResponseStatus for std::result::Result<T, E>
where
	T: ResponseStatus,
	E: ResponseStatus,
{
	fn response_status(&self) -> Option<u16> {
		match self {
			Ok(value) => value.response_status(),
			Err(err) => err.response_status(),
		}
	}
}
