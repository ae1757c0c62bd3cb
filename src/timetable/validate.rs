use tracing::{info, warn};

use crate::model::{DayRecord, ParseReport, Schedule};

use super::calendar::{MonthInput, calendar_weekday, day_code, days_in_month, parse_day_code};
use super::{ParseError, ParseOptions};

/// Accepts `rows` as the complete timetable of (`year`, `month`) or explains why not.
///
/// Rows are inspected in the order given and returned untouched. The row count must
/// match the calendar; with `enforce_sequence` the dates must climb by one and the
/// weekdays must follow each other. A first row that is not the 1st, or whose weekday
/// disagrees with the calendar, only produces a warning.
pub fn validate_schedule(
    rows: Vec<DayRecord>,
    year: i32,
    month: &MonthInput,
    options: &ParseOptions,
) -> Result<ParseReport, ParseError> {
    let month_number = month.resolve()?;
    let expected = days_in_month(year, month_number)?;

    if rows.len() != expected as usize {
        return Err(ParseError::RowCountMismatch {
            expected,
            found: rows.len(),
        });
    }

    if options.enforce_sequence {
        check_sequence(&rows)?;
    }

    let mut warnings = Vec::new();
    if let Some(first) = rows.first() {
        if first.date != 1 {
            warnings.push(format!("first row is dated {} instead of 1", first.date));
        }

        if let (Some(printed), Some(actual)) = (
            parse_day_code(&first.day),
            calendar_weekday(year, month_number, first.date),
        ) {
            if printed != actual {
                warnings.push(format!(
                    "first row says {} but {}-{:02}-{:02} is a {}",
                    first.day,
                    year,
                    month_number,
                    first.date,
                    day_code(actual)
                ));
            }
        }
    }

    for message in &warnings {
        warn!(year, month = month_number, warning = %message, "timetable accepted with warning");
    }
    info!(year, month = month_number, rows = rows.len(), "timetable validated");

    Ok(ParseReport {
        schedule: Schedule {
            year,
            month: month_number,
            days: rows,
        },
        warnings,
        line_stats: None,
    })
}

fn check_sequence(rows: &[DayRecord]) -> Result<(), ParseError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };

    let mut weekday = parse_day_code(&first.day).ok_or_else(|| ParseError::InvalidDayToken {
        token: first.day.clone(),
    })?;
    let mut date = first.date;

    for row in &rows[1..] {
        if Some(row.date) != date.checked_add(1) {
            return Err(ParseError::DateSequenceBroken {
                prev: date,
                found: row.date,
            });
        }

        let expected = weekday.succ();
        if parse_day_code(&row.day) != Some(expected) {
            return Err(ParseError::WeekdaySequenceBroken {
                expected: day_code(expected).to_string(),
                found: row.day.clone(),
            });
        }

        date = row.date;
        weekday = expected;
    }

    Ok(())
}
