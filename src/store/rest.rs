//! Reqwest-backed [`NetworkStore`] that maps operations onto REST routes.
//!
//! | Operation          | Verb     | Route                          |
//! |--------------------|----------|--------------------------------|
//! | search             | `POST`   | `/<search_path>/<Entity>`      |
//! | create             | `POST`   | `/<Entity>`                    |
//! | fetch              | `GET`    | `/<Entity>/<id>`               |
//! | edit               | `PUT`    | `/<Entity>/<id>`               |
//! | delete             | `DELETE` | `/<Entity>/<id>`               |
//! | perform function   | `POST`   | `/<Entity>/<id>/<function>`    |
//!
//! Payloads are sent as JSON. Non-2xx responses become [`Error::Status`] so the status is
//! visible to the unauthorized check. Redirects are not followed: a signature covers one
//! path, and a redirected request would arrive with a stale one.

// std
use std::ops::Deref;
// crates.io
use reqwest::{ClientBuilder, redirect::Policy};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, MalformedRequestError, TransportError},
	http::{CONTENT_TYPE, HeaderValue, Method, StoreRequest, StoreResponse},
	store::{JsonObject, NetworkStore, StoreDescriptor, StoreFuture, StoreOperation},
};

/// Reqwest transport plus the descriptor that shapes its routes.
#[derive(Clone, Debug)]
pub struct HttpStore {
	client: ReqwestClient,
	descriptor: StoreDescriptor,
}
impl HttpStore {
	/// Creates a store with a client that never follows redirects.
	///
	/// # Errors
	///
	/// Returns [`ConfigError::HttpClientBuild`] when reqwest cannot build the client, e.g.
	/// because the TLS backend fails to initialise.
	pub fn new(descriptor: StoreDescriptor) -> Result<Self> {
		let client = build_client().map_err(ConfigError::from)?;

		Ok(Self { client, descriptor })
	}

	/// Wraps an existing reqwest client. Configure it to disable redirects.
	pub fn with_client(descriptor: StoreDescriptor, client: ReqwestClient) -> Self {
		Self { client, descriptor }
	}

	/// Returns the descriptor.
	pub fn descriptor(&self) -> &StoreDescriptor {
		&self.descriptor
	}

	fn route(&self, operation: &StoreOperation) -> Result<(Method, Url), ConfigError> {
		let descriptor = &self.descriptor;

		match operation {
			StoreOperation::Search { entity, .. } =>
				Ok((Method::POST, descriptor.route(&[&descriptor.search_path, entity])?)),
			StoreOperation::Create { entity, .. } =>
				Ok((Method::POST, descriptor.route(&[entity])?)),
			StoreOperation::Fetch { entity, id } =>
				Ok((Method::GET, descriptor.route(&[entity, &id.to_string()])?)),
			StoreOperation::Edit { entity, id, .. } =>
				Ok((Method::PUT, descriptor.route(&[entity, &id.to_string()])?)),
			StoreOperation::Delete { entity, id } =>
				Ok((Method::DELETE, descriptor.route(&[entity, &id.to_string()])?)),
			StoreOperation::PerformFunction { entity, id, function, .. } =>
				Ok((Method::POST, descriptor.route(&[entity, &id.to_string(), function])?)),
		}
	}

	fn encode(&self, payload: &JsonObject) -> Result<Vec<u8>> {
		let encoded = if self.descriptor.pretty_print_json {
			serde_json::to_vec_pretty(payload)
		} else {
			serde_json::to_vec(payload)
		};

		encoded.map_err(Error::Payload)
	}
}
impl AsRef<ReqwestClient> for HttpStore {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl Deref for HttpStore {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}
impl NetworkStore for HttpStore {
	fn build_request(&self, operation: &StoreOperation) -> Result<StoreRequest> {
		let (method, url) = self.route(operation)?;
		let payload = match operation {
			StoreOperation::Search { parameters, .. } => Some(parameters),
			StoreOperation::Create { initial_values, .. } => initial_values.as_ref(),
			StoreOperation::Edit { changes, .. } => Some(changes),
			StoreOperation::PerformFunction { payload, .. } => payload.as_ref(),
			StoreOperation::Fetch { .. } | StoreOperation::Delete { .. } => None,
		};
		let mut request = StoreRequest::new(method, url);

		if let Some(payload) = payload {
			request = request
				.with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
				.with_body(self.encode(payload)?);
		}

		Ok(request)
	}

	fn send<'a>(
		&'a self,
		_operation: &'a StoreOperation,
		request: StoreRequest,
	) -> StoreFuture<'a, StoreResponse> {
		Box::pin(async move {
			let StoreRequest { method, url, headers, body } = request;
			let method = method.ok_or(MalformedRequestError::MissingVerb)?;
			let url = url.ok_or(MalformedRequestError::MissingPath)?;
			let mut builder = self.client.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await.map_err(TransportError::from)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

			if status.is_success() {
				Ok(StoreResponse { status: status.as_u16(), headers, body })
			} else {
				Err(Error::status(status.as_u16(), body))
			}
		})
	}
}

fn build_client() -> Result<ReqwestClient, ReqwestError> {
	client_builder().build()
}

fn client_builder() -> ClientBuilder {
	ReqwestClient::builder().redirect(Policy::none())
}
