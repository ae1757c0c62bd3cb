//! Strict parsing and validation of monthly prayer timetables.
//!
//! Raw text (usually OCR output) is split into lines, each line is matched against the
//! row grammar, and the resulting rows are checked against the calendar of the target
//! month. Nothing here performs I/O.

use clap::ValueEnum;
use tracing::info;

use crate::model::{DayRecord, ParseReport, Schedule};

mod calendar;
mod error;
mod row;
mod time;
mod validate;

pub use calendar::{MONTH_NAMES, MonthInput, day_code, days_in_month, parse_day_code};
pub use error::ParseError;
pub use row::{COLUMN_ROW_CELLS, MIRRORED_ROW_CELLS, RowMatcher};
pub use time::{ALTERNATIVE_SEPARATOR, CLOCK_SEPARATOR, normalize_time};
pub use validate::validate_schedule;

/// Where a row's Maghrib jamaat comes from.
///
/// Printed timetables disagree: some carry a single Maghrib column, others a separate
/// jamaat column. The policy is explicit so a row is never silently reinterpreted.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum MaghribJamaat {
    /// Accept rows with or without a Maghrib jamaat column.
    #[default]
    Auto,
    /// Rows have no Maghrib jamaat column; jamaat equals start.
    MirrorStart,
    /// Rows always carry a Maghrib jamaat column.
    Column,
}

impl MaghribJamaat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::MirrorStart => "mirror-start",
            Self::Column => "column",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub include_sunrise: bool,
    pub enforce_sequence: bool,
    pub maghrib_jamaat: MaghribJamaat,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            include_sunrise: false,
            enforce_sequence: true,
            maghrib_jamaat: MaghribJamaat::Auto,
        }
    }
}

/// Parses `raw_text` and validates it as the full timetable of (`year`, `month`).
pub fn parse_and_validate(
    raw_text: &str,
    year: i32,
    month: impl Into<MonthInput>,
    options: &ParseOptions,
) -> Result<Schedule, ParseError> {
    parse_and_validate_report(raw_text, year, &month.into(), options).map(|report| report.schedule)
}

pub fn parse_and_validate_report(
    raw_text: &str,
    year: i32,
    month: &MonthInput,
    options: &ParseOptions,
) -> Result<ParseReport, ParseError> {
    // An unknown month is reported before any line is looked at.
    month.resolve()?;

    let matcher = RowMatcher::new(options);
    let (rows, line_stats) = matcher.match_text(raw_text)?;

    info!(
        lines = line_stats.lines_total,
        rows = line_stats.matched_rows,
        headers = line_stats.header_lines,
        dropped = line_stats.dropped_lines,
        maghrib_jamaat = options.maghrib_jamaat.as_str(),
        "matched timetable rows"
    );

    let mut report = validate_schedule(rows, year, month, options)?;
    report.line_stats = Some(line_stats);
    Ok(report)
}

/// Validates rows that an extractor already delivered in structured form.
pub fn validate_rows(
    rows: Vec<DayRecord>,
    year: i32,
    month: &MonthInput,
    options: &ParseOptions,
) -> Result<ParseReport, ParseError> {
    let rows = if options.include_sunrise {
        rows
    } else {
        rows.into_iter()
            .map(|row| DayRecord {
                sunrise: None,
                ..row
            })
            .collect()
    };

    validate_schedule(rows, year, month, options)
}
