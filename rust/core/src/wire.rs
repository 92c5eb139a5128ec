//! Shared primitive layout rules
//!
//! The byte-level contract both the outbound builder and the inbound reader
//! encode against. Integers are little-endian and fixed-width; the two
//! conversions with actual content live here so the writer and reader sides
//! cannot drift apart: UTF-16LE text and 100-nanosecond tick timestamps.

use chrono::{DateTime, Utc};

use crate::error::{ProtocolError, Result};

/// 100-nanosecond intervals per second, the tick resolution of the wire format
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Tick count of the Unix epoch (1970-01-01T00:00:00Z, measured from year 1)
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Largest valid tick count, 9999-12-31T23:59:59.9999999
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

const NANOS_PER_TICK: i64 = 100;

/// Converts a UTC instant to its on-wire tick count
///
/// Ticks are 100ns intervals since 0001-01-01T00:00:00 UTC; instants outside
/// years 1-9999 are not encodable. Sub-tick precision truncates.
pub fn ticks_from_datetime(value: DateTime<Utc>) -> Result<i64> {
    let subsec_ticks = i64::from(value.timestamp_subsec_nanos()) / NANOS_PER_TICK;
    value
        .timestamp()
        .checked_mul(TICKS_PER_SECOND)
        .and_then(|ticks| ticks.checked_add(subsec_ticks))
        .and_then(|ticks| ticks.checked_add(UNIX_EPOCH_TICKS))
        .filter(|ticks| (0..=MAX_TICKS).contains(ticks))
        .ok_or(ProtocolError::UnencodableTimestamp(value))
}

/// Reconstructs the UTC instant from an on-wire tick count
pub fn datetime_from_ticks(ticks: i64) -> Result<DateTime<Utc>> {
    if !(0..=MAX_TICKS).contains(&ticks) {
        return Err(ProtocolError::TimestampOutOfRange(ticks));
    }

    let unix_ticks = ticks - UNIX_EPOCH_TICKS;
    let secs = unix_ticks.div_euclid(TICKS_PER_SECOND);
    let nanos = (unix_ticks.rem_euclid(TICKS_PER_SECOND) * NANOS_PER_TICK) as u32;
    DateTime::from_timestamp(secs, nanos).ok_or(ProtocolError::TimestampOutOfRange(ticks))
}

/// Encodes text as UTF-16LE bytes, two bytes per code unit
///
/// Characters outside the basic plane become surrogate pairs, so the byte
/// length is not always twice the character count.
pub fn utf16_bytes(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}

/// Decodes UTF-16LE bytes produced by [`utf16_bytes`]
pub fn utf16_string(bytes: &[u8]) -> Result<String> {
    if bytes.len() % 2 != 0 {
        let length = i32::try_from(bytes.len()).unwrap_or(i32::MAX);
        return Err(ProtocolError::InvalidStringLength(length));
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(ProtocolError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unix_epoch_tick_offset() {
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(ticks_from_datetime(epoch).unwrap(), UNIX_EPOCH_TICKS);
    }

    #[test]
    fn test_ticks_roundtrip_preserves_instant() {
        let instant = Utc
            .with_ymd_and_hms(2024, 11, 5, 17, 30, 59)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(123_456_700))
            .unwrap();

        let ticks = ticks_from_datetime(instant).unwrap();
        assert_eq!(datetime_from_ticks(ticks).unwrap(), instant);
    }

    #[test]
    fn test_sub_tick_precision_truncates() {
        let instant = Utc
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap()
            .checked_add_signed(chrono::Duration::nanoseconds(150))
            .unwrap();

        let ticks = ticks_from_datetime(instant).unwrap();
        let rebuilt = datetime_from_ticks(ticks).unwrap();
        assert_eq!(rebuilt.timestamp_subsec_nanos(), 100);
    }

    #[test]
    fn test_pre_unix_instants_encode() {
        let instant = Utc.with_ymd_and_hms(1899, 12, 31, 23, 59, 59).unwrap();
        let ticks = ticks_from_datetime(instant).unwrap();

        assert!(ticks > 0);
        assert!(ticks < UNIX_EPOCH_TICKS);
        assert_eq!(datetime_from_ticks(ticks).unwrap(), instant);
    }

    #[test]
    fn test_tick_range_bounds() {
        assert_eq!(datetime_from_ticks(0).unwrap().timestamp(), -62_135_596_800);

        let max = datetime_from_ticks(MAX_TICKS).unwrap();
        assert_eq!(max.timestamp_subsec_nanos(), 999_999_900);
        assert_eq!(ticks_from_datetime(max).unwrap(), MAX_TICKS);
    }

    #[test]
    fn test_out_of_range_ticks_rejected() {
        for ticks in [-1, MAX_TICKS + 1, i64::MIN, i64::MAX] {
            assert!(matches!(
                datetime_from_ticks(ticks),
                Err(ProtocolError::TimestampOutOfRange(t)) if t == ticks
            ));
        }
    }

    #[test]
    fn test_unencodable_instants_rejected() {
        let before_year_one = DateTime::from_timestamp(-62_135_596_801, 0).unwrap();
        assert!(matches!(
            ticks_from_datetime(before_year_one),
            Err(ProtocolError::UnencodableTimestamp(_))
        ));

        let after_year_9999 = DateTime::from_timestamp(253_402_300_800, 0).unwrap();
        assert!(matches!(
            ticks_from_datetime(after_year_9999),
            Err(ProtocolError::UnencodableTimestamp(_))
        ));
    }

    #[test]
    fn test_utf16_ascii() {
        let bytes = utf16_bytes("ok");
        assert_eq!(bytes, vec![b'o', 0, b'k', 0]);
        assert_eq!(utf16_string(&bytes).unwrap(), "ok");
    }

    #[test]
    fn test_utf16_surrogate_pairs() {
        // U+1F980 is two code units, four bytes
        let bytes = utf16_bytes("🦀");
        assert_eq!(bytes.len(), 4);
        assert_eq!(utf16_string(&bytes).unwrap(), "🦀");
    }

    #[test]
    fn test_utf16_odd_length_rejected() {
        let err = utf16_string(&[0x41, 0x00, 0x42]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidStringLength(3)));
    }

    #[test]
    fn test_utf16_unpaired_surrogate_rejected() {
        // lone high surrogate 0xD800
        let err = utf16_string(&[0x00, 0xd8]).unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidUtf16(_)));
    }
}
