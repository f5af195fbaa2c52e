//! HMAC request signing for networked object stores, with a per-session broadcast whenever the
//! server rejects the session's credentials.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod http;
pub mod notify;
pub mod obs;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test`
	//! crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use time::macros;
	// self
	use crate::{
		auth::{Credentials, FixedClock},
		notify::{UnauthorizedEvent, UnauthorizedObserver},
	};

	/// Instant used by the reference signing vectors (`Thu, 04 Jun 2015 00:00:00 GMT`).
	pub const REFERENCE_INSTANT: OffsetDateTime = macros::datetime!(2015-06-04 00:00:00 UTC);

	/// Clock frozen at [`REFERENCE_INSTANT`].
	pub fn reference_clock() -> FixedClock {
		FixedClock(REFERENCE_INSTANT)
	}

	/// Credentials used by the reference signing vectors (`U` / `P`).
	pub fn reference_credentials() -> Credentials {
		Credentials::new("U", "P").expect("Reference credentials should be valid.")
	}

	/// Observer that records every event it receives.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingObserver {
		events: Arc<Mutex<Vec<UnauthorizedEvent>>>,
	}
	impl RecordingObserver {
		/// Returns a snapshot of the recorded events.
		pub fn events(&self) -> Vec<UnauthorizedEvent> {
			self.events.lock().clone()
		}
	}
	impl UnauthorizedObserver for RecordingObserver {
		fn on_unauthorized(&self, event: &UnauthorizedEvent) {
			self.events.lock().push(event.clone());
		}
	}
}

mod _prelude {
	#[cfg(test)]
	pub use std::error::Error as StdError;
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	#[cfg(any(test, feature = "test"))]
	pub use parking_lot::Mutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
