//! Timestamp encoding for TEXT columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so `ORDER BY` on the raw column is chronological.

use chrono::{DateTime, SecondsFormat, Utc};

pub fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decodes a stored timestamp. Unparseable values decode as the Unix epoch
/// so a corrupt row sorts last instead of failing the whole query.
pub fn decode_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_encoding_sorts_chronologically() {
        let whole = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::milliseconds(100);

        let a = encode_timestamp(&whole);
        let b = encode_timestamp(&fractional);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn test_roundtrip_and_fallback() {
        let at = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(decode_timestamp(&encode_timestamp(&at)), at);
        assert_eq!(decode_timestamp("not a date"), DateTime::<Utc>::UNIX_EPOCH);
    }
}
