use std::fmt;

use serde::{Deserialize, Serialize};

use crate::timetable::{ParseError, normalize_time};

/// Canonical clock time, or two alternatives joined by `/` (e.g. `12.30/01.30`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeValue(String);

impl TimeValue {
    /// Wraps text that the normalizer has already canonicalized.
    pub(crate) fn from_canonical(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn alternatives(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl fmt::Display for TimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TimeValue {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize_time(&value)
    }
}

impl From<TimeValue> for String {
    fn from(value: TimeValue) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerWindow {
    pub start: TimeValue,
    pub jamaat: TimeValue,
}

impl PrayerWindow {
    /// Window whose jamaat is the start time, as printed for Maghrib.
    pub fn mirrored(start: TimeValue) -> Self {
        Self {
            jamaat: start.clone(),
            start,
        }
    }
}

/// One calendar day of a timetable. `day` holds the uppercased source token;
/// the validator decides whether it is a real weekday code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: u8,
    pub day: String,
    pub fajr: PrayerWindow,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunrise: Option<TimeValue>,
    pub dhuhar: PrayerWindow,
    pub asr: PrayerWindow,
    pub maghrib: PrayerWindow,
    pub isha: PrayerWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LineStats {
    pub lines_total: usize,
    pub blank_lines: usize,
    pub header_lines: usize,
    pub matched_rows: usize,
    pub dropped_lines: usize,
}

/// A validated schedule plus what was learned while producing it.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub schedule: Schedule,
    pub warnings: Vec<String>,
    pub line_stats: Option<LineStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimetableSummary {
    pub year: i32,
    pub month: u32,
    pub status: String,
    pub row_count: i64,
    pub source_kind: String,
    pub source_sha256: String,
    pub error: Option<String>,
    pub updated_at: String,
}
