use anyhow::{Context, Result};
use prayer_timetable::extract::open_source;
use prayer_timetable::util::emit_json;
use tracing::info;

use super::process_source;
use crate::cli::ParseArgs;

pub fn run(args: ParseArgs) -> Result<()> {
    let kind = args.source.resolved_kind();
    let source = open_source(kind, args.source.input.clone(), &args.source.ocr_lang);

    let report = process_source(
        source.as_ref(),
        args.source.year,
        &args.source.month,
        &args.parser.options(),
    )
    .with_context(|| {
        format!(
            "failed to parse {} for {} {}",
            args.source.input.display(),
            args.source.month,
            args.source.year
        )
    })?;

    if args.report {
        emit_json(args.output.as_deref(), &report)?;
    } else {
        emit_json(args.output.as_deref(), &report.schedule)?;
    }

    if let Some(path) = &args.output {
        info!(path = %path.display(), rows = report.schedule.days.len(), "wrote schedule");
    }

    Ok(())
}
