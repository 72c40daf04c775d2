//! Utility functions for the estimator

use crate::error::{EstimateError, Result};
use crate::types::SECONDS_PER_WAIT_CODE;
use chrono::{DateTime, NaiveDateTime};

/// Timestamp layouts seen in wait-time feeds, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Convert a wait code to seconds
pub fn code_to_seconds(code: u64) -> u64 {
    code * SECONDS_PER_WAIT_CODE
}

/// Average of wait codes rounded up to a whole code, in seconds
///
/// Divides by the number of codes actually supplied. Returns `None` when
/// the iterator is empty.
pub fn ceiling_average_seconds<I>(codes: I) -> Option<u64>
where
    I: IntoIterator<Item = u64>,
{
    let (sum, count) = codes
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), code| (sum + code, count + 1));

    if count == 0 {
        return None;
    }

    Some(code_to_seconds(sum.div_ceil(count)))
}

/// Parse a reading timestamp in any of the supported layouts
pub fn parse_reading_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

/// Validate and upper-case a three letter airport shortcode
pub fn normalize_shortcode(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(EstimateError::InvalidShortcode {
            shortcode: raw.to_string(),
        }
        .into());
    }
    Ok(trimmed.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_ceiling_average_rounds_up() {
        assert_eq!(ceiling_average_seconds([2, 3, 1, 4, 2]), Some(1800));
        assert_eq!(ceiling_average_seconds([1, 1]), Some(600));
        assert_eq!(ceiling_average_seconds([0, 0, 1]), Some(600));
        assert_eq!(ceiling_average_seconds([0, 0]), Some(0));
    }

    #[test]
    fn test_ceiling_average_empty() {
        assert_eq!(ceiling_average_seconds(Vec::<u64>::new()), None);
    }

    #[test]
    fn test_parse_tsa_timestamp() {
        let parsed = parse_reading_timestamp("2/3/2016 4:33:08 PM").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2016, 2, 3).unwrap());
        assert_eq!(parsed.hour(), 16);
        assert_eq!(parsed.second(), 8);
    }

    #[test]
    fn test_parse_iso_and_rfc3339() {
        assert!(parse_reading_timestamp("2016-02-03T16:33:08").is_some());
        assert!(parse_reading_timestamp("2016-02-03T16:33:08Z").is_some());
        assert!(parse_reading_timestamp("2016-02-03 16:33:08").is_some());
        assert!(parse_reading_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_normalize_shortcode() {
        assert_eq!(normalize_shortcode("dca").unwrap(), "DCA");
        assert_eq!(normalize_shortcode(" Sfo ").unwrap(), "SFO");
        assert!(normalize_shortcode("DC").is_err());
        assert!(normalize_shortcode("D1A").is_err());
        assert!(normalize_shortcode("DCAX").is_err());
    }
}
