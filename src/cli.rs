use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use prayer_timetable::extract::SourceKind;
use prayer_timetable::{MaghribJamaat, MonthInput, ParseOptions};

const DEFAULT_DB_FILE: &str = "timetables.sqlite";

#[derive(Parser, Debug)]
#[command(
    name = "timetable",
    version,
    about = "Extract and validate monthly prayer timetables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a document and print the validated schedule.
    Parse(ParseArgs),
    /// Parse a document and store the result for its month.
    Ingest(IngestArgs),
    /// Log every stored timetable.
    Status(StatusArgs),
    /// Write the stored prayer data of one month.
    Export(ExportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[arg(long)]
    pub input: PathBuf,

    /// Defaults to a guess from the file extension.
    #[arg(long = "source", value_enum)]
    pub source_kind: Option<SourceKind>,

    #[arg(long)]
    pub year: i32,

    /// Month number (1-12) or English month name.
    #[arg(long)]
    pub month: MonthInput,

    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,
}

impl SourceArgs {
    pub fn resolved_kind(&self) -> SourceKind {
        self.source_kind.unwrap_or_else(|| SourceKind::from_path(&self.input))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ParserArgs {
    #[arg(long, default_value_t = false)]
    pub include_sunrise: bool,

    #[arg(long, default_value_t = false)]
    pub no_sequence_check: bool,

    #[arg(long, value_enum, default_value_t = MaghribJamaat::Auto)]
    pub maghrib_jamaat: MaghribJamaat,
}

impl ParserArgs {
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            include_sunrise: self.include_sunrise,
            enforce_sequence: !self.no_sequence_check,
            maghrib_jamaat: self.maghrib_jamaat,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub parser: ParserArgs,

    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Emit warnings and line statistics alongside the schedule.
    #[arg(long, default_value_t = false)]
    pub report: bool,
}

#[derive(Args, Debug, Clone)]
pub struct IngestArgs {
    #[arg(long, default_value = ".cache/timetable")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Reprocess even when this document is already stored.
    #[arg(long, default_value_t = false)]
    pub force: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/timetable")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[arg(long, default_value = ".cache/timetable")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub year: i32,

    #[arg(long)]
    pub month: MonthInput,

    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn resolve_db_path(cache_root: &Path, db_path: Option<&PathBuf>) -> PathBuf {
    db_path
        .cloned()
        .unwrap_or_else(|| cache_root.join(DEFAULT_DB_FILE))
}
