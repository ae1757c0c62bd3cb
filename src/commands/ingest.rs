use anyhow::Result;
use prayer_timetable::extract::{ExtractorRejection, open_source};
use prayer_timetable::model::ParseReport;
use prayer_timetable::store::{
    SourceRecord, already_populated, open_store, record_rejection, upsert_accepted,
};
use prayer_timetable::timetable::ParseError;
use prayer_timetable::util::{ensure_directory, sha256_file};
use rusqlite::Connection;
use tracing::{info, warn};

use super::process_source;
use crate::cli::{IngestArgs, resolve_db_path};


pub fn run(args: IngestArgs) -> Result<()> {
    let year = args.source.year;
    let month = args.source.month.resolve()?;
    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_ref());
    if let Some(parent) = db_path.parent() {
        ensure_directory(parent)?;
    }

    info!(
        db_path = %db_path.display(),
        input = %args.source.input.display(),
        year,
        month,
        "starting ingest"
    );

    let connection = open_store(&db_path)?;
    let kind = args.source.resolved_kind();
    let record = SourceRecord {
        kind: kind.as_str().to_string(),
        path: args.source.input.display().to_string(),
        sha256: sha256_file(&args.source.input)?,
    };

    if !args.force && already_populated(&connection, year, month, &record.sha256)? {
        info!(
            year,
            month,
            sha256 = %record.sha256,
            "timetable already populated from this document; skipping"
        );
        return Ok(());
    }

    let source = open_source(kind, args.source.input.clone(), &args.source.ocr_lang);
    let outcome = process_source(
        source.as_ref(),
        year,
        &args.source.month,
        &args.parser.options(),
    );
    store_outcome(&connection, year, month, &record, outcome)
}

/// Stores an accepted schedule, or records a rejection when the document itself was
/// refused. Extraction and tool failures leave the stored entry untouched.
fn store_outcome(
    connection: &Connection,
    year: i32,
    month: u32,
    record: &SourceRecord,
    outcome: Result<ParseReport>,
) -> Result<()> {
    match outcome {
        Ok(report) => {
            upsert_accepted(connection, &report, record)?;
            info!(
                year,
                month,
                rows = report.schedule.days.len(),
                warnings = report.warnings.len(),
                "timetable stored"
            );
            Ok(())
        }
        Err(err) if is_document_rejection(&err) => {
            let reason = format!("{err:#}");
            record_rejection(connection, year, month, record, &reason)?;
            warn!(year, month, reason = %reason, "timetable rejected");
            Err(err.context(format!("timetable {year}-{month:02} rejected")))
        }
        Err(err) => Err(err.context(format!(
            "failed to extract timetable {year}-{month:02} from {}",
            record.path
        ))),
    }
}

fn is_document_rejection(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ParseError>().is_some() || err.downcast_ref::<ExtractorRejection>().is_some()
}
