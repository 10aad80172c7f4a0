//! HTTP cache validation module
//!
//! Provides `Last-Modified` formatting and `If-Modified-Since` evaluation.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a modification time as an HTTP date
///
/// # Returns
/// IMF-fixdate string, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

/// Check whether the client's cached copy is still current
///
/// `If-None-Match` takes precedence; when present the date is ignored.
/// Unparseable dates never match.
///
/// # Arguments
/// * `if_modified_since` - Client-sent If-Modified-Since header
/// * `has_if_none_match` - Whether the request also carried If-None-Match
/// * `modified` - File modification time
///
/// # Returns
/// Returns true if the response should be 304, false otherwise
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
    // HTTP dates have whole-second precision
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(format_http_date(at(784_111_777)), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_not_modified() {
        let header = format_http_date(at(784_111_777));
        assert!(is_not_modified(Some(&header), false, at(784_111_777)));
        assert!(is_not_modified(
            Some(&header),
            false,
            at(784_111_777) + Duration::from_millis(500)
        ));
        assert!(is_not_modified(Some(&header), false, at(784_111_000)));
    }

    #[test]
    fn test_modified_after() {
        let header = format_http_date(at(784_111_777));
        assert!(!is_not_modified(Some(&header), false, at(784_111_778)));
    }

    #[test]
    fn test_if_none_match_wins() {
        let header = format_http_date(at(784_111_777));
        assert!(!is_not_modified(Some(&header), true, at(784_111_777)));
    }

    #[test]
    fn test_invalid_or_missing_date() {
        assert!(!is_not_modified(None, false, at(0)));
        assert!(!is_not_modified(Some("yesterday"), false, at(0)));
    }
}
