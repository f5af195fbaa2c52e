//! Optional observability helpers for store operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `signed_store.operation` with the
//!   `operation` and `stage` (call site) fields, plus a warning event whenever the server
//!   rejects the session's credentials.
//! - Enable `metrics` to increment the `signed_store_operation_total` counter for every
//!   attempt/success/failure/unauthorized outcome, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Store operation kinds routed through the authenticated decorator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
	/// Entity search.
	Search,
	/// Single-entity fetch.
	Fetch,
	/// Entity creation.
	Create,
	/// Entity edit.
	Edit,
	/// Entity deletion.
	Delete,
	/// Server-side function invocation on an entity.
	PerformFunction,
}
impl OperationKind {
	/// Every operation kind, in declaration order.
	pub const ALL: [OperationKind; 6] = [
		OperationKind::Search,
		OperationKind::Fetch,
		OperationKind::Create,
		OperationKind::Edit,
		OperationKind::Delete,
		OperationKind::PerformFunction,
	];

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Search => "search",
			OperationKind::Fetch => "fetch",
			OperationKind::Create => "create",
			OperationKind::Edit => "edit",
			OperationKind::Delete => "delete",
			OperationKind::PerformFunction => "perform_function",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to the decorator.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Server rejected the session's credentials.
	Unauthorized,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
			OperationOutcome::Unauthorized => "unauthorized",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
