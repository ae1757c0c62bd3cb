use anyhow::Result;
use prayer_timetable::store::{list_timetables, open_store};
use tracing::{info, warn};

use crate::cli::{StatusArgs, resolve_db_path};

pub fn run(args: StatusArgs) -> Result<()> {
    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_ref());

    info!(cache_root = %args.cache_root.display(), "status requested");

    if !db_path.exists() {
        warn!(path = %db_path.display(), "database file missing");
        return Ok(());
    }

    let connection = open_store(&db_path)?;
    let timetables = list_timetables(&connection)?;
    info!(path = %db_path.display(), timetables = timetables.len(), "database status");

    for timetable in timetables {
        if timetable.error.is_some() {
            warn!(
                year = timetable.year,
                month = timetable.month,
                status = %timetable.status,
                source = %timetable.source_kind,
                sha256 = %timetable.source_sha256,
                error = %timetable.error.unwrap_or_default(),
                updated_at = %timetable.updated_at,
                "stored timetable"
            );
        } else {
            info!(
                year = timetable.year,
                month = timetable.month,
                status = %timetable.status,
                rows = timetable.row_count,
                source = %timetable.source_kind,
                sha256 = %timetable.source_sha256,
                updated_at = %timetable.updated_at,
                "stored timetable"
            );
        }
    }

    Ok(())
}
