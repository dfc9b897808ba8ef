use crate::TIMESTAMP_FORMAT;

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use log::debug;

/// Formats a timestamp as `YYYY-MM-DDTHH:mm:ss.SSSZ` in UTC.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses the canonical timestamp format. Any other shape yields `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    match NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            debug!("Unparsable timestamp '{value}': {e}");
            None
        }
    }
}

/// Truncates to the millisecond precision the canonical format persists.
pub fn canonicalize(timestamp: &DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(3)
}
