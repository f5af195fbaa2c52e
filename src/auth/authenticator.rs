//! Request authenticator that signs outgoing requests with `Authorization` + `Date` headers.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthenticationContext, Clock, Credentials, HmacTokenGenerator, SystemClock,
		TokenGenerator, date,
	},
	error::MalformedRequestError,
	ext::RequestSigner,
	http::{AUTHORIZATION, DATE, HeaderValue, StoreRequest},
};

/// Signs a request with the default [`HmacTokenGenerator`].
///
/// See [`authenticate_with`] for the exact contract.
pub fn authenticate(
	request: &StoreRequest,
	credentials: &Credentials,
	now: OffsetDateTime,
) -> Result<StoreRequest, MalformedRequestError> {
	authenticate_with(request, credentials, &HmacTokenGenerator::default(), now)
}

/// Signs a request with the provided generator.
///
/// The returned request is a copy of `request` whose `Authorization` and `Date` headers are
/// set (or overwritten); verb, URL, body, and every other header are untouched. The
/// original request is never mutated, so callers can replay it.
///
/// # Errors
///
/// Returns [`MalformedRequestError::MissingVerb`] or [`MalformedRequestError::MissingPath`]
/// when the request cannot be described by an [`AuthenticationContext`]. Nothing is signed
/// in that case.
pub fn authenticate_with(
	request: &StoreRequest,
	credentials: &Credentials,
	generator: &dyn TokenGenerator,
	now: OffsetDateTime,
) -> Result<StoreRequest, MalformedRequestError> {
	let verb = request.method.as_ref().ok_or(MalformedRequestError::MissingVerb)?;
	let path = request.path().ok_or(MalformedRequestError::MissingPath)?;
	let date = date::format_http_date(now)
		.map_err(|_| MalformedRequestError::InvalidHeaderValue { header: "Date" })?;
	let context = AuthenticationContext::new(verb.as_str(), path, date);
	let token = generator.generate(credentials, &context);
	let mut authorization = HeaderValue::from_str(token.expose())
		.map_err(|_| MalformedRequestError::InvalidHeaderValue { header: "Authorization" })?;
	let date = HeaderValue::from_str(&context.date)
		.map_err(|_| MalformedRequestError::InvalidHeaderValue { header: "Date" })?;

	authorization.set_sensitive(true);

	let mut signed = request.clone();

	signed.headers.insert(AUTHORIZATION, authorization);
	signed.headers.insert(DATE, date);

	Ok(signed)
}

/// Session-scoped authenticator bundling credentials, a token generator, and a clock.
#[derive(Clone)]
pub struct Authenticator {
	credentials: Credentials,
	generator: Arc<dyn TokenGenerator>,
	clock: Arc<dyn Clock>,
}
impl Authenticator {
	/// Creates an authenticator using [`HmacTokenGenerator`] and the system clock.
	pub fn new(credentials: Credentials) -> Self {
		Self {
			credentials,
			generator: Arc::new(HmacTokenGenerator::default()),
			clock: Arc::new(SystemClock),
		}
	}

	/// Replaces the token generator.
	pub fn with_generator(mut self, generator: impl 'static + TokenGenerator) -> Self {
		self.generator = Arc::new(generator);

		self
	}

	/// Replaces the clock.
	pub fn with_clock(mut self, clock: impl 'static + Clock) -> Self {
		self.clock = Arc::new(clock);

		self
	}

	/// Returns the credentials this authenticator signs with.
	pub fn credentials(&self) -> &Credentials {
		&self.credentials
	}

	/// Signs `request` as of `now`.
	pub fn authenticate_at(
		&self,
		request: &StoreRequest,
		now: OffsetDateTime,
	) -> Result<StoreRequest, MalformedRequestError> {
		authenticate_with(request, &self.credentials, self.generator.as_ref(), now)
	}
}
impl RequestSigner<StoreRequest, MalformedRequestError> for Authenticator {
	fn sign(&self, request: &StoreRequest) -> Result<StoreRequest, MalformedRequestError> {
		self.authenticate_at(request, self.clock.now())
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator").field("username", &self.credentials.username).finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::{auth::FixedClock, http::Method};

	fn credentials() -> Credentials {
		Credentials::new("U", "P").expect("Credential fixture should be valid.")
	}

	fn request() -> StoreRequest {
		StoreRequest::new(
			Method::GET,
			Url::parse("https://store.example.com/Users/1").expect("Fixture URL should parse."),
		)
	}

	#[test]
	fn signs_reference_request() {
		let signed = authenticate(&request(), &credentials(), datetime!(2015-06-04 00:00:00 UTC))
			.expect("Reference request should sign.");

		assert_eq!(signed.header(&DATE), Some("Thu, 04 Jun 2015 00:00:00 GMT"));
		assert_eq!(
			signed.header(&AUTHORIZATION),
			Some("U:xbuBHob89bwaDShV0Wqrs7sxv2lgJ/IugTGZF82phdk=")
		);
		assert!(signed.headers[AUTHORIZATION].is_sensitive());
	}

	#[test]
	fn signer_uses_injected_clock() {
		let authenticator = Authenticator::new(credentials())
			.with_clock(FixedClock(datetime!(2015-06-04 00:00:00 UTC)));
		let signed = authenticator.sign(&request()).expect("Reference request should sign.");

		assert_eq!(signed.header(&DATE), Some("Thu, 04 Jun 2015 00:00:00 GMT"));
		assert_eq!(format!("{authenticator:?}"), "Authenticator { username: Username(U) }");
	}

	#[test]
	fn missing_parts_are_rejected() {
		let now = datetime!(2015-06-04 00:00:00 UTC);
		let mut no_verb = request();

		no_verb.method = None;

		assert_eq!(
			authenticate(&no_verb, &credentials(), now),
			Err(MalformedRequestError::MissingVerb)
		);

		let mut no_url = request();

		no_url.url = None;

		assert_eq!(
			authenticate(&no_url, &credentials(), now),
			Err(MalformedRequestError::MissingPath)
		);
	}
}
