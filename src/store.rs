use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::model::{ParseReport, TimetableSummary};
use crate::util::now_utc_string;

#[cfg(test)]
mod tests;

const DB_SCHEMA_VERSION: &str = "0.1.0";

/// Stored schedules with more rows than this count as already populated.
pub const MIN_POPULATED_ROWS: i64 = 5;

pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_REJECTED: &str = "rejected";

/// Where a stored timetable came from.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    pub kind: String,
    pub path: String,
    pub sha256: String,
}

pub fn open_store(db_path: &Path) -> Result<Connection> {
    let connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;
    Ok(connection)
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS metadata (
              key TEXT PRIMARY KEY,
              value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS timetables (
              year INTEGER NOT NULL,
              month INTEGER NOT NULL,
              status TEXT NOT NULL,
              row_count INTEGER NOT NULL DEFAULT 0,
              prayer_data TEXT,
              warnings TEXT,
              source_kind TEXT NOT NULL,
              source_path TEXT,
              source_sha256 TEXT NOT NULL,
              error TEXT,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL,
              PRIMARY KEY (year, month)
            );
            ",
        )
        .context("failed to create timetable schema")?;

    connection
        .execute(
            "INSERT INTO metadata(key, value) VALUES('db_schema_version', ?1)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![DB_SCHEMA_VERSION],
        )
        .context("failed to record schema version")?;

    Ok(())
}

pub fn upsert_accepted(
    connection: &Connection,
    report: &ParseReport,
    source: &SourceRecord,
) -> Result<()> {
    let schedule = &report.schedule;
    let prayer_data =
        serde_json::to_string(&schedule.days).context("failed to serialize prayer data")?;
    let warnings =
        serde_json::to_string(&report.warnings).context("failed to serialize warnings")?;
    let now = now_utc_string();

    connection
        .execute(
            "
            INSERT INTO timetables(
              year, month, status, row_count, prayer_data, warnings,
              source_kind, source_path, source_sha256, error, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL, ?10, ?10)
            ON CONFLICT(year, month) DO UPDATE SET
              status = excluded.status,
              row_count = excluded.row_count,
              prayer_data = excluded.prayer_data,
              warnings = excluded.warnings,
              source_kind = excluded.source_kind,
              source_path = excluded.source_path,
              source_sha256 = excluded.source_sha256,
              error = NULL,
              updated_at = excluded.updated_at
            ",
            params![
                schedule.year,
                schedule.month,
                STATUS_ACCEPTED,
                schedule.days.len() as i64,
                prayer_data,
                warnings,
                source.kind,
                source.path,
                source.sha256,
                now,
            ],
        )
        .with_context(|| {
            format!(
                "failed to store timetable {}-{:02}",
                schedule.year, schedule.month
            )
        })?;

    Ok(())
}

/// Records why the latest document for (`year`, `month`) was refused. Any earlier
/// prayer data is cleared because it no longer matches the stored source.
pub fn record_rejection(
    connection: &Connection,
    year: i32,
    month: u32,
    source: &SourceRecord,
    reason: &str,
) -> Result<()> {
    let now = now_utc_string();

    connection
        .execute(
            "
            INSERT INTO timetables(
              year, month, status, row_count, prayer_data, warnings,
              source_kind, source_path, source_sha256, error, created_at, updated_at
            ) VALUES (?1, ?2, ?3, 0, NULL, NULL, ?4, ?5, ?6, ?7, ?8, ?8)
            ON CONFLICT(year, month) DO UPDATE SET
              status = excluded.status,
              row_count = 0,
              prayer_data = NULL,
              warnings = NULL,
              source_kind = excluded.source_kind,
              source_path = excluded.source_path,
              source_sha256 = excluded.source_sha256,
              error = excluded.error,
              updated_at = excluded.updated_at
            ",
            params![
                year,
                month,
                STATUS_REJECTED,
                source.kind,
                source.path,
                source.sha256,
                reason,
                now,
            ],
        )
        .with_context(|| format!("failed to record rejection for {year}-{month:02}"))?;

    Ok(())
}

/// True when an accepted schedule from the same source bytes is already stored.
pub fn already_populated(
    connection: &Connection,
    year: i32,
    month: u32,
    source_sha256: &str,
) -> Result<bool> {
    let stored = connection
        .query_row(
            "
            SELECT status, row_count, source_sha256
            FROM timetables
            WHERE year = ?1 AND month = ?2
            ",
            params![year, month],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()
        .context("failed to look up stored timetable")?;

    Ok(match stored {
        Some((status, row_count, sha256)) => {
            status == STATUS_ACCEPTED
                && row_count > MIN_POPULATED_ROWS
                && sha256 == source_sha256
        }
        None => false,
    })
}

/// Raw prayer data JSON of an accepted timetable.
pub fn load_prayer_data(connection: &Connection, year: i32, month: u32) -> Result<Option<String>> {
    let data = connection
        .query_row(
            "SELECT prayer_data FROM timetables WHERE year = ?1 AND month = ?2 AND status = ?3",
            params![year, month, STATUS_ACCEPTED],
            |row| row.get::<_, Option<String>>(0),
        )
        .optional()
        .context("failed to load prayer data")?;

    Ok(data.flatten())
}

pub fn list_timetables(connection: &Connection) -> Result<Vec<TimetableSummary>> {
    let mut statement = connection
        .prepare(
            "
            SELECT year, month, status, row_count, source_kind, source_sha256, error, updated_at
            FROM timetables
            ORDER BY year, month
            ",
        )
        .context("failed to prepare timetable listing")?;

    let rows = statement
        .query_map([], |row| {
            Ok(TimetableSummary {
                year: row.get(0)?,
                month: row.get(1)?,
                status: row.get(2)?,
                row_count: row.get(3)?,
                source_kind: row.get(4)?,
                source_sha256: row.get(5)?,
                error: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })
        .context("failed to list timetables")?;

    let mut summaries = Vec::new();
    for row in rows {
        summaries.push(row.context("failed to read timetable row")?);
    }
    Ok(summaries)
}
