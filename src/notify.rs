//! Unauthorized-event broadcasting.
//!
//! Each store session owns an [`UnauthorizedNotifier`]. Observers subscribe to it and are
//! called synchronously, on the task that completed the request, whenever the server
//! rejects the session's credentials. Broadcasting is best-effort: zero subscribers is
//! fine, and concurrent requests may deliver overlapping events.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{_prelude::*, auth::Username, obs::OperationKind};

/// Signal raised when a response reports that the session's credentials were rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnauthorizedEvent {
	/// Username of the session that sent the rejected request.
	pub username: Username,
	/// Operation that observed the rejection.
	pub operation: OperationKind,
	/// HTTP status reported by the server.
	pub status: u16,
}
impl UnauthorizedEvent {
	/// Stable event name for observers that multiplex several signals.
	pub const NAME: &'static str = "authentication_did_fail";
	/// HTTP status code that triggers the event.
	pub const STATUS: u16 = 401;
}

/// Callback invoked for every [`UnauthorizedEvent`].
pub trait UnauthorizedObserver
where
	Self: Send + Sync,
{
	/// Handles a single event. Implementations should return quickly; they run inline with
	/// response handling.
	fn on_unauthorized(&self, event: &UnauthorizedEvent);
}
impl<F> UnauthorizedObserver for F
where
	F: Send + Sync + Fn(&UnauthorizedEvent),
{
	fn on_unauthorized(&self, event: &UnauthorizedEvent) {
		self(event)
	}
}

/// Handle returned by [`UnauthorizedNotifier::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Registry of [`UnauthorizedObserver`]s for one session.
#[derive(Default)]
pub struct UnauthorizedNotifier {
	next_id: AtomicU64,
	observers: RwLock<BTreeMap<SubscriptionId, Arc<dyn UnauthorizedObserver>>>,
}
impl UnauthorizedNotifier {
	/// Registers an observer and returns its subscription handle.
	pub fn subscribe(&self, observer: impl 'static + UnauthorizedObserver) -> SubscriptionId {
		let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));

		self.observers.write().insert(id, Arc::new(observer));

		id
	}

	/// Removes an observer. Returns `false` when the handle was already removed.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.observers.write().remove(&id).is_some()
	}

	/// Returns the number of registered observers.
	pub fn len(&self) -> usize {
		self.observers.read().len()
	}

	/// Returns `true` when nobody is subscribed.
	pub fn is_empty(&self) -> bool {
		self.observers.read().is_empty()
	}

	/// Delivers `event` to every observer registered at the time of the call.
	///
	/// The registry lock is released before callbacks run, so observers may subscribe or
	/// unsubscribe from inside their callback.
	pub fn notify(&self, event: &UnauthorizedEvent) {
		let observers = self.observers.read().values().cloned().collect::<Vec<_>>();

		for observer in observers {
			observer.on_unauthorized(event);
		}
	}
}
impl Debug for UnauthorizedNotifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UnauthorizedNotifier").field("observers", &self.len()).finish()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::AtomicUsize;
	// self
	use super::*;

	fn event() -> UnauthorizedEvent {
		UnauthorizedEvent {
			username: Username::new("alice").expect("Username fixture should be valid."),
			operation: OperationKind::Fetch,
			status: UnauthorizedEvent::STATUS,
		}
	}

	#[test]
	fn notify_without_observers_is_a_noop() {
		let notifier = UnauthorizedNotifier::default();

		assert!(notifier.is_empty());
		notifier.notify(&event());
	}

	#[test]
	fn unsubscribed_observers_stop_receiving_events() {
		let notifier = UnauthorizedNotifier::default();
		let hits = Arc::new(AtomicUsize::new(0));
		let counter = hits.clone();
		let id = notifier.subscribe(move |_: &UnauthorizedEvent| {
			counter.fetch_add(1, Ordering::SeqCst);
		});

		notifier.notify(&event());

		assert!(notifier.unsubscribe(id));
		assert!(!notifier.unsubscribe(id));

		notifier.notify(&event());

		assert_eq!(hits.load(Ordering::SeqCst), 1);
	}

	#[test]
	fn observers_may_unsubscribe_during_delivery() {
		let notifier = Arc::new(UnauthorizedNotifier::default());
		let slot = Arc::new(Mutex::new(None::<SubscriptionId>));
		let (inner, inner_slot) = (Arc::downgrade(&notifier), slot.clone());
		let id = notifier.subscribe(move |_: &UnauthorizedEvent| {
			if let (Some(notifier), Some(id)) = (inner.upgrade(), inner_slot.lock().take()) {
				notifier.unsubscribe(id);
			}
		});

		*slot.lock() = Some(id);
		notifier.notify(&event());

		assert!(notifier.is_empty());
	}

	#[test]
	fn event_serializes_with_operation_label() {
		let payload = serde_json::to_value(event()).expect("Event should serialize to JSON.");

		assert_eq!(
			payload,
			serde_json::json!({ "username": "alice", "operation": "fetch", "status": 401 })
		);
	}
}
