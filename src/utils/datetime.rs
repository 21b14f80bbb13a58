//! Date and time parsing/formatting shared by the request builder and the
//! analytics entities.

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Wall-clock formats accepted from form input and from the backend.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Errors from converting wall-clock input to an instant.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateTimeInputError {
    #[error("Unrecognized date/time: {0}")]
    InvalidFormat(String),

    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(String),
}

/// Formats an instant the way browsers' `toISOString` does:
/// millisecond precision, `Z` suffix.
pub fn iso_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// Converts a wall-clock value entered in `tz` into an absolute UTC instant.
///
/// Accepts `YYYY-MM-DDTHH:MM` (the `datetime-local` input shape), the same with
/// seconds, or a full RFC 3339 timestamp, which is taken as-is. Ambiguous local
/// times (DST fall-back) resolve to the earlier instant.
///
/// # Errors
///
/// Returns [`DateTimeInputError::InvalidFormat`] for unparseable input and
/// [`DateTimeInputError::NonexistentLocalTime`] for times skipped by a DST jump.
pub fn local_input_to_utc<Tz: TimeZone>(
    input: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, DateTimeInputError> {
    let input = input.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(input) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive =
        parse_naive(input).ok_or_else(|| DateTimeInputError::InvalidFormat(input.to_string()))?;

    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(DateTimeInputError::NonexistentLocalTime(input.to_string())),
    }
}

/// Parses a click timestamp into local wall-clock time.
///
/// Naive timestamps are kept as-is; timestamps with an offset are shifted to
/// the local time zone.
pub fn parse_click_timestamp(input: &str) -> Option<NaiveDateTime> {
    parse_naive(input).or_else(|| {
        DateTime::parse_from_rfc3339(input)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local())
    })
}
