//! RFC 1123 HTTP-date formatting shared by signers and verifiers.

// crates.io
use time::{
	PrimitiveDateTime, UtcOffset,
	format_description::BorrowedFormatItem,
	macros::format_description,
};
// self
use crate::_prelude::*;

const HTTP_DATE: &[BorrowedFormatItem<'_>] = format_description!(
	"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Formats an instant as an HTTP-date, e.g. `Thu, 04 Jun 2015 00:00:00 GMT`.
///
/// The instant is converted to UTC first, so callers may pass any offset.
pub fn format_http_date(instant: OffsetDateTime) -> Result<String, time::error::Format> {
	instant.to_offset(UtcOffset::UTC).format(HTTP_DATE)
}

/// Parses an HTTP-date produced by [`format_http_date`].
pub fn parse_http_date(raw: &str) -> Option<OffsetDateTime> {
	PrimitiveDateTime::parse(raw.trim(), HTTP_DATE).ok().map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn formats_reference_instant() {
		assert_eq!(
			format_http_date(datetime!(2015-06-04 00:00:00 UTC)).ok().as_deref(),
			Some("Thu, 04 Jun 2015 00:00:00 GMT")
		);
	}

	#[test]
	fn converts_offsets_to_gmt() {
		assert_eq!(
			format_http_date(datetime!(2015-06-04 02:30:15 +02:00)).ok().as_deref(),
			Some("Thu, 04 Jun 2015 00:30:15 GMT")
		);
	}

	#[test]
	fn parse_accepts_formatted_value() {
		let instant = datetime!(2024-02-29 23:59:59 UTC);
		let formatted = format_http_date(instant).expect("Fixture instant should format.");
		let parsed = parse_http_date(&formatted).expect("Formatted HTTP-date should parse back.");

		assert_eq!(parsed, instant);
		assert!(parse_http_date("2015-06-04T00:00:00Z").is_none());
	}
}
