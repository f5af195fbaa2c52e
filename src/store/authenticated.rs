//! Authenticated store session.
//!
//! [`AuthenticatedStore`] decorates any [`NetworkStore`]. Every request the inner store
//! builds is signed by the session's [`Authenticator`], and every result the inner store
//! returns passes through one unauthorized check before reaching the caller unchanged.
//! Because the decorator implements [`NetworkStore`] itself, it can be stacked with other
//! decorators.

// self
use crate::{
	_prelude::*,
	auth::{Authenticator, Clock, Credentials, TokenGenerator},
	ext::RequestSigner,
	http::{StoreRequest, StoreResponse},
	notify::{SubscriptionId, UnauthorizedEvent, UnauthorizedNotifier, UnauthorizedObserver},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	store::{JsonObject, NetworkStore, ResponseStatus, StoreFuture, StoreOperation},
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::HmacTokenGenerator,
	store::{HttpStore, StoreDescriptor},
};

#[cfg(feature = "reqwest")]
/// Session specialized for the crate's default reqwest store.
pub type ReqwestStore = AuthenticatedStore<HttpStore>;

/// Store session that signs requests and reports rejected credentials.
pub struct AuthenticatedStore<S>
where
	S: NetworkStore,
{
	inner: S,
	authenticator: Authenticator,
	notifier: Arc<UnauthorizedNotifier>,
}
impl<S> AuthenticatedStore<S>
where
	S: NetworkStore,
{
	/// Wraps `inner` with the default HMAC authenticator for `credentials`.
	pub fn new(inner: S, credentials: Credentials) -> Self {
		Self::with_authenticator(inner, Authenticator::new(credentials))
	}

	/// Wraps `inner` with a preconfigured authenticator.
	pub fn with_authenticator(inner: S, authenticator: Authenticator) -> Self {
		Self { inner, authenticator, notifier: Default::default() }
	}

	/// Replaces the token generator used for signing.
	pub fn with_generator(mut self, generator: impl 'static + TokenGenerator) -> Self {
		self.authenticator = self.authenticator.with_generator(generator);

		self
	}

	/// Replaces the clock used for the `Date` header.
	pub fn with_clock(mut self, clock: impl 'static + Clock) -> Self {
		self.authenticator = self.authenticator.with_clock(clock);

		self
	}

	/// Shares an existing notifier, e.g. to fan several sessions into one set of observers.
	pub fn with_notifier(mut self, notifier: Arc<UnauthorizedNotifier>) -> Self {
		self.notifier = notifier;

		self
	}

	/// Returns the wrapped store.
	pub fn inner(&self) -> &S {
		&self.inner
	}

	/// Returns the session credentials.
	pub fn credentials(&self) -> &Credentials {
		self.authenticator.credentials()
	}

	/// Returns the notifier that delivers this session's unauthorized events.
	pub fn notifier(&self) -> &Arc<UnauthorizedNotifier> {
		&self.notifier
	}

	/// Registers an unauthorized-event observer.
	pub fn subscribe(&self, observer: impl 'static + UnauthorizedObserver) -> SubscriptionId {
		self.notifier.subscribe(observer)
	}

	/// Removes an unauthorized-event observer.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.notifier.unsubscribe(id)
	}

	/// Builds, signs, and sends `operation`.
	///
	/// The result is returned exactly as the inner store produced it. When it carries HTTP
	/// 401, one [`UnauthorizedEvent`] is delivered first.
	pub async fn execute(&self, operation: StoreOperation) -> Result<StoreResponse> {
		let kind = operation.kind();
		let span = OperationSpan::new(kind, "execute");

		obs::record_operation_outcome(kind, OperationOutcome::Attempt);

		let result = span.instrument(self.perform(&operation)).await;

		if let Some(outcome) = completion_outcome(&result) {
			obs::record_operation_outcome(kind, outcome);
		}

		result
	}

	/// Searches `entity` with server-defined `parameters`.
	pub async fn search(
		&self,
		entity: impl Into<String>,
		parameters: JsonObject,
	) -> Result<StoreResponse> {
		self.execute(StoreOperation::Search { entity: entity.into(), parameters }).await
	}

	/// Fetches one resource.
	pub async fn fetch(&self, entity: impl Into<String>, id: u64) -> Result<StoreResponse> {
		self.execute(StoreOperation::Fetch { entity: entity.into(), id }).await
	}

	/// Creates a resource.
	pub async fn create(
		&self,
		entity: impl Into<String>,
		initial_values: Option<JsonObject>,
	) -> Result<StoreResponse> {
		self.execute(StoreOperation::Create { entity: entity.into(), initial_values }).await
	}

	/// Edits a resource.
	pub async fn edit(
		&self,
		entity: impl Into<String>,
		id: u64,
		changes: JsonObject,
	) -> Result<StoreResponse> {
		self.execute(StoreOperation::Edit { entity: entity.into(), id, changes }).await
	}

	/// Deletes a resource.
	pub async fn delete(&self, entity: impl Into<String>, id: u64) -> Result<StoreResponse> {
		self.execute(StoreOperation::Delete { entity: entity.into(), id }).await
	}

	/// Invokes a server-side function on a resource.
	pub async fn perform_function(
		&self,
		entity: impl Into<String>,
		id: u64,
		function: impl Into<String>,
		payload: Option<JsonObject>,
	) -> Result<StoreResponse> {
		self.execute(StoreOperation::PerformFunction {
			entity: entity.into(),
			id,
			function: function.into(),
			payload,
		})
		.await
	}

	fn observe(&self, kind: OperationKind, result: &impl ResponseStatus) {
		if !result.is_unauthorized() {
			return;
		}

		let username = self.credentials().username.clone();

		obs::log_unauthorized(kind, &username);
		obs::record_operation_outcome(kind, OperationOutcome::Unauthorized);

		self.notifier.notify(&UnauthorizedEvent {
			username,
			operation: kind,
			status: UnauthorizedEvent::STATUS,
		});
	}
}
#[cfg(feature = "reqwest")]
impl AuthenticatedStore<HttpStore> {
	/// Creates a reqwest-backed session for `descriptor`, signing with the descriptor's
	/// digest.
	///
	/// # Errors
	///
	/// Propagates [`ConfigError::HttpClientBuild`](crate::error::ConfigError::HttpClientBuild)
	/// when the HTTP client cannot be built.
	pub fn connect(descriptor: StoreDescriptor, credentials: Credentials) -> Result<Self> {
		let generator = HmacTokenGenerator::new(descriptor.signature_algorithm);

		Ok(Self::new(HttpStore::new(descriptor)?, credentials).with_generator(generator))
	}
}
impl<S> NetworkStore for AuthenticatedStore<S>
where
	S: NetworkStore,
{
	fn build_request(&self, operation: &StoreOperation) -> Result<StoreRequest> {
		let request = self.inner.build_request(operation)?;

		Ok(self.authenticator.sign(&request)?)
	}

	fn send<'a>(
		&'a self,
		operation: &'a StoreOperation,
		request: StoreRequest,
	) -> StoreFuture<'a, StoreResponse> {
		Box::pin(async move {
			let result = self.inner.send(operation, request).await;

			self.observe(operation.kind(), &result);

			result
		})
	}
}
impl<S> Debug for AuthenticatedStore<S>
where
	S: NetworkStore,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthenticatedStore")
			.field("authenticator", &self.authenticator)
			.field("notifier", &self.notifier)
			.finish()
	}
}

/// Outcome recorded when `execute` completes. Rejected credentials are recorded once, as
/// [`OperationOutcome::Unauthorized`], by the send hook.
fn completion_outcome(result: &Result<StoreResponse>) -> Option<OperationOutcome> {
	if result.is_unauthorized() {
		None
	} else if result.is_ok() {
		Some(OperationOutcome::Success)
	} else {
		Some(OperationOutcome::Failure)
	}
}
