use anyhow::Result;
use prayer_timetable::extract::{Extraction, TimetableSource};
use prayer_timetable::model::ParseReport;
use prayer_timetable::timetable::{
    MonthInput, ParseOptions, parse_and_validate_report, validate_rows,
};
use tracing::info;

pub mod export;
pub mod ingest;
pub mod parse;
pub mod status;

/// Pulls text or rows out of `source` and validates them for (`year`, `month`).
fn process_source(
    source: &dyn TimetableSource,
    year: i32,
    month: &MonthInput,
    options: &ParseOptions,
) -> Result<ParseReport> {
    info!(
        path = %source.path().display(),
        source = source.kind().as_str(),
        year,
        month = %month,
        "extracting timetable"
    );

    let report = match source.extract()? {
        Extraction::Text(text) => parse_and_validate_report(&text, year, month, options)?,
        Extraction::Rows(rows) => {
            info!(rows = rows.len(), "extractor returned structured rows");
            validate_rows(rows, year, month, options)?
        }
    };

    Ok(report)
}
