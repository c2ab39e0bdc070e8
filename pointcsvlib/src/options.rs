//! Input options for report streaming.
//!
//! This module contains the configuration types that control how timestamps
//! are formatted and how rows are encoded.

use chrono::{DateTime, Local, Utc};
use std::str::FromStr;

use crate::error::PointCsvError;
use crate::Result;

/// Format used for the `Time` column
pub const TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Zone in which sample timestamps are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZone {
    /// Coordinated universal time
    #[default]
    Utc,
    /// The host's local zone
    Local,
}

impl TimeZone {
    /// Format epoch milliseconds as `yyyy/MM/dd HH:mm:ss`.
    ///
    /// Returns `None` when the timestamp is outside the representable range.
    pub fn format_millis(&self, millis: i64) -> Option<String> {
        let utc = DateTime::<Utc>::from_timestamp_millis(millis)?;
        Some(match self {
            TimeZone::Utc => utc.format(TIME_FORMAT).to_string(),
            TimeZone::Local => utc.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        })
    }
}

impl FromStr for TimeZone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "utc" => Ok(TimeZone::Utc),
            "local" => Ok(TimeZone::Local),
            _ => Err(format!("Unknown time zone: {}", s)),
        }
    }
}

/// Line ending written after each encoded row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineTerminator {
    /// `\r\n`
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl FromStr for LineTerminator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "crlf" => Ok(LineTerminator::Crlf),
            "lf" => Ok(LineTerminator::Lf),
            _ => Err(format!("Unknown line terminator: {}", s)),
        }
    }
}

/// Options for one report stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamOptions {
    /// Zone for the `Time` column
    pub time_zone: TimeZone,
    /// Field delimiter byte
    pub delimiter: u8,
    /// Row terminator
    pub terminator: LineTerminator,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            time_zone: TimeZone::Utc,
            delimiter: b',',
            terminator: LineTerminator::Crlf,
        }
    }
}

impl StreamOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time zone for timestamps.
    pub fn time_zone(mut self, zone: TimeZone) -> Self {
        self.time_zone = zone;
        self
    }

    /// Set the field delimiter. Must be a single ASCII character.
    pub fn delimiter(mut self, delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(PointCsvError::Config(format!(
                "delimiter must be a single ASCII character other than quote or newline, got {:?}",
                delimiter
            )));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    /// Set the row terminator.
    pub fn terminator(mut self, terminator: LineTerminator) -> Self {
        self.terminator = terminator;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_millis_utc() {
        // 2024-03-01T12:34:56Z
        let formatted = TimeZone::Utc.format_millis(1_709_296_496_000).unwrap();
        assert_eq!(formatted, "2024/03/01 12:34:56");
    }

    #[test]
    fn test_format_millis_drops_fraction() {
        assert_eq!(
            TimeZone::Utc.format_millis(999).unwrap(),
            "1970/01/01 00:00:00"
        );
        assert_eq!(
            TimeZone::Utc.format_millis(-1_000).unwrap(),
            "1969/12/31 23:59:59"
        );
    }

    #[test]
    fn test_format_millis_out_of_range() {
        assert!(TimeZone::Utc.format_millis(i64::MAX).is_none());
    }

    #[test]
    fn test_time_zone_from_str() {
        assert_eq!("UTC".parse::<TimeZone>().unwrap(), TimeZone::Utc);
        assert_eq!("local".parse::<TimeZone>().unwrap(), TimeZone::Local);
        assert!("mars".parse::<TimeZone>().is_err());
    }

    #[test]
    fn test_delimiter_validation() {
        let options = StreamOptions::new().delimiter(';').unwrap();
        assert_eq!(options.delimiter, b';');
        assert!(StreamOptions::new().delimiter('€').is_err());
        assert!(StreamOptions::new().delimiter('"').is_err());
    }

    #[test]
    fn test_builder() {
        let options = StreamOptions::new()
            .time_zone(TimeZone::Local)
            .terminator(LineTerminator::Lf);
        assert_eq!(options.time_zone, TimeZone::Local);
        assert_eq!(options.terminator, LineTerminator::Lf);
        assert_eq!(options.delimiter, b',');
    }
}
