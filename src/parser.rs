//! Email parser: headers, date and normalized plain-text body

use crate::error::{ParseError, ParseResult};
use crate::mime::{MimePart, Part, plain_text_parts};
use crate::normalize::normalize_text;
use crate::types::Email;
use chrono::{DateTime, FixedOffset, Weekday};
use regex::Regex;
use tracing::debug;

/// Accepted `Date` header layout, e.g. `Mon, 01 Jan 2024 10:00:00 +0000`
pub const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// [`DATE_FORMAT`] without its leading `%a, `
const DATE_FORMAT_AFTER_WEEKDAY: &str = "%d %b %Y %H:%M:%S %z";

// chrono alone accepts short years and elided spaces; pin the exact shape first
static DATE_SHAPE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{3}), (\d{1,2} [A-Za-z]{3} \d{4} \d{1,2}:\d{2}:\d{2} [+-]\d{2}:?\d{2})$")
        .unwrap()
});

/// Parse raw RFC 5322 bytes into an [`Email`]
pub fn parse_email(raw: &[u8]) -> ParseResult<Email> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| ParseError::Structure(e.to_string()))?;
    parse(&Part::from(&parsed))
}

/// Build an [`Email`] from an already decoded MIME tree.
///
/// Fails only when the `Date` header is missing or not in [`DATE_FORMAT`].
pub fn parse<P: MimePart>(message: &P) -> ParseResult<Email> {
    let subject = message.header("Subject").unwrap_or_default();
    let date = message
        .header("Date")
        .ok_or_else(|| ParseError::MissingHeader("Date".into()))?;
    let date = parse_date(&date)?;
    let body = extract_body(message);

    debug!("Parsed email: {subject} ({date}), {} body bytes", body.len());

    Ok(Email {
        date: Some(date),
        subject,
        body,
        ..Email::default()
    })
}

/// Parse a `Date` header value strictly against [`DATE_FORMAT`].
///
/// The weekday must be a valid abbreviation but is not checked against the
/// calendar date; everything after it must match exactly.
pub fn parse_date(value: &str) -> ParseResult<DateTime<FixedOffset>> {
    let invalid = |details: String| ParseError::InvalidDate {
        value: value.to_string(),
        details,
    };

    let captures = DATE_SHAPE_REGEX
        .captures(value)
        .ok_or_else(|| invalid(format!("expected {DATE_FORMAT}")))?;
    let (weekday, rest) = (&captures[1], &captures[2]);
    if weekday.parse::<Weekday>().is_err() {
        return Err(invalid(format!("unknown weekday {weekday:?}")));
    }

    DateTime::parse_from_str(rest, DATE_FORMAT_AFTER_WEEKDAY).map_err(|e| invalid(e.to_string()))
}

/// Normalize every plain-text part and join the parts with a newline
fn extract_body<P: MimePart>(message: &P) -> String {
    plain_text_parts(message)
        .map(|part| normalize_text(&part))
        .collect::<Vec<_>>()
        .join("\n")
}
