//! Archive file name timestamps
//!
//! Backups are named by formatting the creation time with a strftime-style
//! pattern (e.g. `Backup-%Y-%m-%d--%H-%M.zip`). The same pattern is used to
//! recover the creation time from an existing archive's name.

use crate::error::{BackupError, Result};
use crate::utils::archive::ARCHIVE_EXTENSION;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

/// Time zone that archive names are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeZoneSetting {
    Utc,
    Local,
    Fixed(FixedOffset),
}

impl TimeZoneSetting {
    fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            TimeZoneSetting::Utc => Utc.fix(),
            TimeZoneSetting::Local => Local.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            TimeZoneSetting::Fixed(offset) => *offset,
        }
    }

    fn resolve(&self, naive: &NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        match self {
            TimeZoneSetting::Utc => Some(Utc.from_utc_datetime(naive).fixed_offset()),
            // Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant
            TimeZoneSetting::Local => Local
                .from_local_datetime(naive)
                .earliest()
                .map(|dt| dt.fixed_offset()),
            TimeZoneSetting::Fixed(offset) => offset.from_local_datetime(naive).single(),
        }
    }
}

impl Default for TimeZoneSetting {
    fn default() -> Self {
        TimeZoneSetting::Utc
    }
}

impl FromStr for TimeZoneSetting {
    type Err = BackupError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "utc" | "z" => Ok(TimeZoneSetting::Utc),
            "local" => Ok(TimeZoneSetting::Local),
            _ => trimmed
                .parse::<FixedOffset>()
                .map(TimeZoneSetting::Fixed)
                .map_err(|_| BackupError::InvalidTimeZone {
                    value: value.to_string(),
                }),
        }
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Utc => write!(f, "UTC"),
            TimeZoneSetting::Local => write!(f, "local"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

/// Formats and parses archive names according to a single pattern
#[derive(Debug, Clone)]
pub struct TimestampCodec {
    pattern: String,
    zone: TimeZoneSetting,
}

impl TimestampCodec {
    /// Create a codec, rejecting patterns that cannot round-trip a timestamp
    ///
    /// A usable pattern needs a full date plus hour and minute; seconds are
    /// optional and read back as zero when absent.
    pub fn new(pattern: &str, zone: TimeZoneSetting) -> Result<Self> {
        let invalid = || BackupError::InvalidFormat {
            pattern: pattern.to_string(),
        };

        if pattern.is_empty()
            || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
        {
            return Err(invalid());
        }

        let codec = Self {
            pattern: pattern.to_string(),
            zone,
        };

        let sample_instant = Utc
            .with_ymd_and_hms(2001, 2, 3, 4, 5, 6)
            .single()
            .ok_or_else(invalid)?;
        let sample = codec.format(&sample_instant);

        // Archive names must stay a single path component
        if sample.contains(['/', '\\']) || codec.parse(&sample).is_err() {
            return Err(invalid());
        }

        Ok(codec)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn zone(&self) -> TimeZoneSetting {
        self.zone
    }

    /// Render `instant` in the configured zone
    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        let offset = self.zone.offset_at(instant);
        instant
            .with_timezone(&offset)
            .format(&self.pattern)
            .to_string()
    }

    /// File name for a new archive created at `instant`
    pub fn archive_name(&self, instant: &DateTime<Utc>) -> String {
        let name = self.format(instant);
        if self.pattern_has_extension() {
            name
        } else {
            format!("{}{}", name, ARCHIVE_EXTENSION)
        }
    }

    /// Recover the creation time encoded in an archive name
    pub fn parse(&self, file_name: &str) -> Result<DateTime<FixedOffset>> {
        let mismatch = || BackupError::FormatMismatch {
            file_name: file_name.to_string(),
            pattern: self.pattern.clone(),
        };

        let candidate = if self.pattern_has_extension() {
            file_name
        } else {
            file_name
                .strip_suffix(ARCHIVE_EXTENSION)
                .unwrap_or(file_name)
        };

        let naive =
            NaiveDateTime::parse_from_str(candidate, &self.pattern).map_err(|_| mismatch())?;

        self.zone.resolve(&naive).ok_or_else(mismatch)
    }

    fn pattern_has_extension(&self) -> bool {
        self.pattern.ends_with(ARCHIVE_EXTENSION)
    }
}
