use anyhow::{Context, Result, bail};
use prayer_timetable::store::{load_prayer_data, open_store};
use prayer_timetable::util::emit_json;
use serde_json::Value;
use tracing::info;

use crate::cli::{ExportArgs, resolve_db_path};

pub fn run(args: ExportArgs) -> Result<()> {
    let month = args.month.resolve()?;
    let db_path = resolve_db_path(&args.cache_root, args.db_path.as_ref());
    if !db_path.exists() {
        bail!("database file missing: {}", db_path.display());
    }

    let connection = open_store(&db_path)?;
    let Some(raw) = load_prayer_data(&connection, args.year, month)? else {
        bail!("no accepted timetable stored for {}-{:02}", args.year, month);
    };
    let data: Value = serde_json::from_str(&raw)
        .with_context(|| format!("stored prayer data for {}-{:02} is corrupt", args.year, month))?;

    emit_json(args.output.as_deref(), &data)?;
    if let Some(path) = &args.output {
        info!(path = %path.display(), year = args.year, month, "exported timetable");
    }

    Ok(())
}
