//! Timestamp normalization
//!
//! COS reports times in several encodings depending on the API: list
//! responses use ISO-8601 with milliseconds, HEAD responses use HTTP-dates.
//! Everything is normalized to a [`jiff::Timestamp`]; `None` means unknown.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::fmt::{rfc2822, strtime};
use jiff::tz::TimeZone;

/// Millisecond layout used by the list API, e.g. `2025-01-02T03:04:05.000Z`
const MILLIS_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Parse a remote timestamp, degrading to `None` for empty or unrecognized
/// input.
///
/// Layouts are tried in order: RFC 3339 (with or without fractional
/// seconds), the millisecond list layout, then HTTP-date.
pub fn parse_time(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    parse_rfc3339(raw)
        .or_else(|| parse_millis(raw))
        .or_else(|| parse_http_date(raw))
}

fn parse_rfc3339(raw: &str) -> Option<Timestamp> {
    raw.parse::<Timestamp>().ok()
}

fn parse_millis(raw: &str) -> Option<Timestamp> {
    let tm = strtime::parse(MILLIS_LAYOUT, raw).ok()?;
    let dt: DateTime = tm.to_datetime().ok()?;
    dt.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp())
}

fn parse_http_date(raw: &str) -> Option<Timestamp> {
    rfc2822::parse(raw).ok().map(|z| z.timestamp())
}

/// Format a timestamp as an HTTP-date (`Wed, 02 Oct 2002 08:00:00 GMT`)
pub fn format_http_date(ts: Timestamp) -> String {
    ts.strftime("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_millis_layout() {
        let ts = parse_time("2025-01-02T03:04:05.000Z").expect("parsed");
        assert_eq!(ts.to_zoned(TimeZone::UTC).year(), 2025);
        assert_eq!(ts.as_second(), 1_735_787_045);
    }

    #[test]
    fn test_parse_rfc3339_variants() {
        let plain = parse_time("2024-06-30T12:00:00Z").unwrap();
        let offset = parse_time("2024-06-30T20:00:00+08:00").unwrap();
        let nanos = parse_time("2024-06-30T12:00:00.123456789Z").unwrap();
        assert_eq!(plain, offset);
        assert_eq!(nanos.as_second(), plain.as_second());
        assert_eq!(nanos.subsec_nanosecond(), 123_456_789);
    }

    #[test]
    fn test_parse_http_date() {
        let ts = parse_time("Wed, 02 Oct 2002 08:00:00 GMT").expect("http date");
        assert_eq!(ts.as_second(), 1_033_545_600);
    }

    #[test]
    fn test_parse_empty_and_garbage() {
        assert!(parse_time("").is_none());
        assert!(parse_time("   ").is_none());
        assert!(parse_time("yesterday").is_none());
        assert!(parse_time("2025-13-45T99:99:99Z").is_none());
    }

    #[test]
    fn test_format_http_date_round_trips() {
        let ts = parse_time("2002-10-02T08:00:00Z").unwrap();
        let formatted = format_http_date(ts);
        assert_eq!(formatted, "Wed, 02 Oct 2002 08:00:00 GMT");
        assert_eq!(parse_time(&formatted), Some(ts));
    }
}
