//! Unit tests for archive name formatting and parsing

use chrono::{FixedOffset, TimeZone, Utc};
use rstest::rstest;
use test_utils::{sample_instant, sample_instants, BackupError, TimeZoneSetting, TimestampCodec};

#[rstest]
#[case("Backup-%Y-%m-%d--%H-%M-%S.zip")]
#[case("world_%Y-%m-%d_%H.%M.%S")]
#[case("%d.%m.%Y %H_%M_%S.zip")]
fn test_round_trip_with_seconds(#[case] pattern: &str) {
    let codec = TimestampCodec::new(pattern, TimeZoneSetting::Utc).unwrap();

    for instant in sample_instants(3) {
        let name = codec.archive_name(&instant);
        assert!(name.ends_with(".zip"));
        let parsed = codec.parse(&name).unwrap();
        assert_eq!(parsed, instant);
    }
}

#[test]
fn test_minute_precision_truncates_seconds() {
    let codec = TimestampCodec::new("Backup-%Y-%m-%d--%H-%M.zip", TimeZoneSetting::Utc).unwrap();
    let instant = Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 45).unwrap();

    let parsed = codec.parse(&codec.archive_name(&instant)).unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap());
}

#[test]
fn test_fixed_offset_zone() {
    let zone: TimeZoneSetting = "+02:00".parse().unwrap();
    let codec = TimestampCodec::new("Backup-%Y-%m-%d--%H-%M-%S.zip", zone).unwrap();

    let name = codec.archive_name(&sample_instant());
    // 12:30 UTC is 14:30 at +02:00
    assert_eq!(name, "Backup-2024-03-15--14-30-00.zip");

    let parsed = codec.parse(&name).unwrap();
    assert_eq!(parsed.offset(), &FixedOffset::east_opt(2 * 3600).unwrap());
    assert_eq!(parsed, sample_instant());
}

#[rstest]
#[case("notes.txt")]
#[case("Backup-2024-03-15.zip")]
#[case("Backup-2024-13-40--99-99-99.zip")]
fn test_mismatched_names(#[case] file_name: &str) {
    let codec =
        TimestampCodec::new("Backup-%Y-%m-%d--%H-%M-%S.zip", TimeZoneSetting::Utc).unwrap();

    let result = codec.parse(file_name);
    assert!(matches!(result, Err(BackupError::FormatMismatch { .. })));
}

#[rstest]
#[case("")]
#[case("backup.zip")]
#[case("Backup-%Y.zip")]
#[case("Backup-%Q.zip")]
#[case("Backup-%D--%H-%M.zip")]
#[case("%Y/%m/%d--%H-%M.zip")]
fn test_unusable_patterns(#[case] pattern: &str) {
    let result = TimestampCodec::new(pattern, TimeZoneSetting::Utc);
    assert!(matches!(result, Err(BackupError::InvalidFormat { .. })));
}

#[rstest]
#[case("UTC", TimeZoneSetting::Utc)]
#[case("utc", TimeZoneSetting::Utc)]
#[case("local", TimeZoneSetting::Local)]
fn test_time_zone_names(#[case] value: &str, #[case] expected: TimeZoneSetting) {
    assert_eq!(value.parse::<TimeZoneSetting>().unwrap(), expected);
}
