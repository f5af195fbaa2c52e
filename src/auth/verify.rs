//! Server-side verification of signed requests.
//!
//! The verifier rebuilds the [`AuthenticationContext`] from the request's verb, path, and
//! `Date` header, so it accepts exactly the requests the authenticator produced for the
//! same credentials.

// self
use crate::{
	_prelude::*,
	auth::{AuthenticationContext, Credentials, HmacTokenGenerator, TokenGenerator, date},
	error::MalformedRequestError,
	http::{AUTHORIZATION, DATE, HeaderName, StoreRequest},
};

/// Reasons a signed request fails verification.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum VerifyError {
	/// Request lacks a verb or path.
	#[error(transparent)]
	MalformedRequest(#[from] MalformedRequestError),
	/// A required header is absent or not visible ASCII.
	#[error("Request is missing the {header} header.")]
	MissingHeader {
		/// Missing header name.
		header: &'static str,
	},
	/// The `Date` header is not an HTTP-date.
	#[error("Date header `{value}` is not a valid HTTP-date.")]
	InvalidDate {
		/// Raw header value.
		value: String,
	},
	/// The `Date` header is too far from the verifier's clock.
	#[error("Date header is {skew} away from the server clock.")]
	ClockSkew {
		/// Absolute distance between the header and the server clock.
		skew: Duration,
	},
	/// The token names a different user than the supplied credentials.
	#[error("Token does not belong to the supplied credentials.")]
	UsernameMismatch,
	/// The signature does not match the request.
	#[error("Token signature does not match the request.")]
	SignatureMismatch,
}

/// Checks `Authorization` + `Date` headers produced by the authenticator.
#[derive(Clone)]
pub struct TokenVerifier {
	generator: Arc<dyn TokenGenerator>,
	max_skew: Duration,
}
impl TokenVerifier {
	const DEFAULT_MAX_SKEW: Duration = Duration::minutes(5);

	/// Creates a verifier for tokens derived by `generator`.
	pub fn new(generator: impl 'static + TokenGenerator) -> Self {
		Self { generator: Arc::new(generator), max_skew: Self::DEFAULT_MAX_SKEW }
	}

	/// Overrides the tolerated clock skew (defaults to five minutes).
	pub fn with_max_skew(mut self, skew: Duration) -> Self {
		self.max_skew = if skew.is_negative() { Duration::ZERO } else { skew };

		self
	}

	/// Returns the username a request claims to be signed by, so callers can look up the
	/// matching credentials before verifying.
	pub fn presented_username(request: &StoreRequest) -> Option<&str> {
		request.header(&AUTHORIZATION)?.split_once(':').map(|(username, _)| username)
	}

	/// Verifies `request` against `credentials` as of `now`.
	pub fn verify(
		&self,
		request: &StoreRequest,
		credentials: &Credentials,
		now: OffsetDateTime,
	) -> Result<(), VerifyError> {
		let verb = request.method.as_ref().ok_or(MalformedRequestError::MissingVerb)?;
		let path = request.path().ok_or(MalformedRequestError::MissingPath)?;
		let token = required_header(request, &AUTHORIZATION, "Authorization")?;
		let raw_date = required_header(request, &DATE, "Date")?;
		let signed_at = date::parse_http_date(raw_date)
			.ok_or_else(|| VerifyError::InvalidDate { value: raw_date.to_owned() })?;
		let skew = (now - signed_at).abs();

		if skew > self.max_skew {
			return Err(VerifyError::ClockSkew { skew });
		}
		if Self::presented_username(request) != Some(&*credentials.username) {
			return Err(VerifyError::UsernameMismatch);
		}

		let context = AuthenticationContext::new(verb.as_str(), path, raw_date);

		if self.generator.verify(credentials, &context, token) {
			Ok(())
		} else {
			Err(VerifyError::SignatureMismatch)
		}
	}
}
impl Default for TokenVerifier {
	fn default() -> Self {
		Self::new(HmacTokenGenerator::default())
	}
}
impl Debug for TokenVerifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenVerifier").field("max_skew", &self.max_skew).finish()
	}
}

fn required_header<'a>(
	request: &'a StoreRequest,
	name: &HeaderName,
	label: &'static str,
) -> Result<&'a str, VerifyError> {
	request.header(name).ok_or(VerifyError::MissingHeader { header: label })
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;
	use crate::{auth::authenticate, http::Method};

	fn credentials() -> Credentials {
		Credentials::new("alice", "wonderland").expect("Credential fixture should be valid.")
	}

	fn signed(at: OffsetDateTime) -> StoreRequest {
		let request = StoreRequest::new(
			Method::PUT,
			Url::parse("https://store.example.com/Lock/7?dry_run=1")
				.expect("Fixture URL should parse."),
		)
		.with_body(r#"{"name":"front door"}"#);

		authenticate(&request, &credentials(), at).expect("Fixture request should sign.")
	}

	#[test]
	fn accepts_freshly_signed_request() {
		let at = datetime!(2025-01-01 12:00:00 UTC);
		let request = signed(at);

		assert_eq!(TokenVerifier::presented_username(&request), Some("alice"));
		assert_eq!(
			TokenVerifier::default().verify(&request, &credentials(), at + Duration::seconds(30)),
			Ok(())
		);
	}

	#[test]
	fn rejects_stale_or_tampered_requests() {
		let at = datetime!(2025-01-01 12:00:00 UTC);
		let verifier = TokenVerifier::default().with_max_skew(Duration::minutes(1));
		let request = signed(at);

		assert_eq!(
			verifier.verify(&request, &credentials(), at + Duration::minutes(2)),
			Err(VerifyError::ClockSkew { skew: Duration::minutes(2) })
		);

		let mut moved = request.clone();

		moved.url = Some(
			Url::parse("https://store.example.com/Lock/8").expect("Fixture URL should parse."),
		);

		assert_eq!(
			verifier.verify(&moved, &credentials(), at),
			Err(VerifyError::SignatureMismatch)
		);

		let other = Credentials::new("bob", "wonderland").expect("Credential fixture is valid.");

		assert_eq!(verifier.verify(&request, &other, at), Err(VerifyError::UsernameMismatch));

		let mut unsigned = request;

		unsigned.headers.remove(DATE);

		assert_eq!(
			verifier.verify(&unsigned, &credentials(), at),
			Err(VerifyError::MissingHeader { header: "Date" })
		);
	}
}
