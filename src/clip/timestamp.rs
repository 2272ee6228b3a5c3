use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

/// A non-negative offset into the source video, held as whole milliseconds
///
/// Offsets are only ever built from text that matches the full timestamp
/// grammar (`[[HH:]MM:]SS[.fraction]`); nothing is partially parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOffset {
    millis: u64,
}

impl TimeOffset {
    /// Build an offset from face values. Fields are not range-checked, so
    /// 70 minutes simply contributes 4200 seconds.
    pub fn from_hms_millis(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Self> {
        let total_secs = hours
            .checked_mul(60)?
            .checked_add(minutes)?
            .checked_mul(60)?
            .checked_add(seconds)?;
        let millis = total_secs.checked_mul(1000)?.checked_add(millis)?;
        Some(Self { millis })
    }

    /// Parse a timestamp string
    ///
    /// Accepts `SS`, `MM:SS` or `HH:MM:SS`, each optionally followed by a
    /// single `.` and one or more digits. Every field must be plain decimal
    /// digits. The fraction is truncated to whole milliseconds.
    pub fn parse(input: &str) -> Result<Self, TimestampError> {
        let invalid = || TimestampError::Invalid {
            input: input.to_string(),
        };

        let (clock, fraction) = match input.split_once('.') {
            Some((clock, fraction)) => (clock, Some(fraction)),
            None => (input, None),
        };

        let millis = match fraction {
            Some(fraction) => parse_fraction_millis(fraction).ok_or_else(invalid)?,
            None => 0,
        };

        let fields: Vec<&str> = clock.split(':').collect();
        if fields.len() > 3 {
            return Err(invalid());
        }

        let mut values = [0u64; 3];
        let offset = 3 - fields.len();
        for (i, field) in fields.iter().enumerate() {
            values[offset + i] = parse_field(field).ok_or_else(invalid)?;
        }

        Self::from_hms_millis(values[0], values[1], values[2], millis).ok_or_else(invalid)
    }

    pub fn total_millis(&self) -> u64 {
        self.millis
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.millis as f64 / 1000.0
    }
}

impl Sub for TimeOffset {
    type Output = u64;

    /// Span between two offsets in milliseconds, saturating at zero
    fn sub(self, rhs: Self) -> u64 {
        self.millis.saturating_sub(rhs.millis)
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.millis / 1000;
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            self.millis % 1000
        )
    }
}

fn parse_field(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Whole milliseconds of a fractional-second digit string, truncated.
fn parse_fraction_millis(fraction: &str) -> Option<u64> {
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(3)
        .fold(0u64, |acc, b| acc * 10 + u64::from(b - b'0'));
    Some(millis)
}

/// A timestamp exactly as the user wrote it in the project file
///
/// YAML hands us either text or a number; numbers are turned into their
/// canonical decimal text before parsing, and that same text is what the
/// extractor receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawTimestamp {
    pub fn to_offset(&self) -> Result<TimeOffset, TimestampError> {
        TimeOffset::parse(&self.to_string())
    }

    /// Parse a timestamp that may be absent altogether
    pub fn parse_optional(raw: Option<&RawTimestamp>) -> Result<TimeOffset, TimestampError> {
        raw.ok_or(TimestampError::Missing)?.to_offset()
    }
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for RawTimestamp {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawTimestamp {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for RawTimestamp {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}
