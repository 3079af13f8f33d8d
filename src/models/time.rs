//! Time formatting helpers shared with the upstream AIS API.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Sentinel instant used for empty tracks: the Unix epoch.
pub fn sentinel_epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Format an instant in the compact `YYYYMMDDHHMM` UTC form the upstream
/// AIS API expects for its time parameters.
pub fn format_compact_utc(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M").to_string()
}

/// Parse the compact `YYYYMMDDHHMM` UTC form.
pub fn parse_compact_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    let naive = NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M")
        .map_err(|e| format!("Invalid time '{}': {}", raw, e))?;
    Ok(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_epoch() {
        assert_eq!(sentinel_epoch().timestamp(), 0);
    }

    #[test]
    fn test_format_compact() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 59).unwrap();
        assert_eq!(format_compact_utc(at), "202403071405");
    }

    #[test]
    fn test_parse_compact_roundtrip() {
        let at = Utc.with_ymd_and_hms(2024, 11, 30, 23, 59, 0).unwrap();
        let parsed = parse_compact_utc(&format_compact_utc(at)).unwrap();
        assert_eq!(parsed, at);
    }

    #[test]
    fn test_parse_compact_rejects_garbage() {
        assert!(parse_compact_utc("2024-03-07").is_err());
        assert!(parse_compact_utc("").is_err());
        assert!(parse_compact_utc("20241332").is_err());
    }
}
