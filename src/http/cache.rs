//! HTTP cache validation module
//!
//! Provides `Last-Modified` formatting and `If-Modified-Since` handling.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a file modification time as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Parse an HTTP date header value; `None` when unparseable
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check whether a conditional GET can be answered with 304
///
/// Compares at second resolution. `If-None-Match` takes precedence over
/// `If-Modified-Since`; since no entity tags are issued, its presence disables
/// the date check.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(
            format_http_date(at(784_111_777)),
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn test_parse_round_trip() {
        let parsed = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(parsed.timestamp(), 784_111_777);
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn test_not_modified() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(is_not_modified(Some(header), false, at(784_111_777)));
        // Sub-second mtime still counts as unchanged
        assert!(is_not_modified(
            Some(header),
            false,
            at(784_111_777) + Duration::from_millis(400)
        ));
        assert!(is_not_modified(Some(header), false, at(784_000_000)));
        assert!(!is_not_modified(Some(header), false, at(784_111_778)));
    }

    #[test]
    fn test_not_modified_ignored_cases() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(!is_not_modified(None, false, at(0)));
        assert!(!is_not_modified(Some("garbage"), false, at(0)));
        assert!(!is_not_modified(Some(header), true, at(0)));
    }
}
