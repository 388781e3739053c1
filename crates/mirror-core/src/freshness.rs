//! Remote freshness decisions
//!
//! A local copy is current when the source's `Last-Modified` is not after
//! the local modification time. Anything that prevents that comparison
//! resolves toward downloading.

use std::time::SystemTime;

use chrono::NaiveDateTime;

/// IMF-fixdate without its leading weekday.
const HTTP_DATE_FORMAT: &str = "%d %b %Y %H:%M:%S GMT";

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Outcome of comparing the remote `Last-Modified` against the local copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Remote is not newer than the local file; no download needed.
    Current { remote: SystemTime, local: SystemTime },
    /// Remote is strictly newer than the local file.
    Stale { remote: SystemTime, local: SystemTime },
    /// The comparison could not be made.
    Unknown { reason: String },
}

impl Freshness {
    /// Compare an optional raw `Last-Modified` value against the local modification time.
    pub fn compare(last_modified: Option<&str>, local: SystemTime) -> Self {
        let Some(raw) = last_modified else {
            return Self::Unknown {
                reason: "no Last-Modified header".to_string(),
            };
        };
        match parse_http_date(raw) {
            Some(remote) if remote > local => Self::Stale { remote, local },
            Some(remote) => Self::Current { remote, local },
            None => Self::Unknown {
                reason: format!("unparseable Last-Modified header {raw:?}"),
            },
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, Self::Current { .. })
    }
}

/// Parse an IMF-fixdate such as `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// Only the literal `GMT` zone is accepted; numeric offsets and obsolete
/// zone names are rejected. The weekday must be a valid name but is not
/// checked against the date.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let (weekday, rest) = value.trim().split_once(", ")?;
    if !WEEKDAYS.iter().any(|day| day.eq_ignore_ascii_case(weekday)) {
        return None;
    }
    NaiveDateTime::parse_from_str(rest, HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| SystemTime::from(naive.and_utc()))
}
