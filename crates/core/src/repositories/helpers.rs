//! Row conversion helpers shared by the repositories.

use crate::{PromptDeskError, PromptDeskResult};
use chrono::{DateTime, Utc};

/// Current time as unix epoch milliseconds, the storage format for every timestamp column.
pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub(crate) fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub(crate) fn from_millis(millis: i64) -> PromptDeskResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(PromptDeskError::InvalidTimestamp(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_round_trip_keeps_precision() {
        let millis = 1_700_000_000_123;
        assert_eq!(to_millis(from_millis(millis).unwrap()), millis);
    }

    #[test]
    fn test_out_of_range_millis_is_an_error() {
        assert!(matches!(
            from_millis(i64::MAX),
            Err(PromptDeskError::InvalidTimestamp(_))
        ));
    }
}
