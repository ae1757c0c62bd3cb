//! Sources that turn an uploaded timetable document into something the parser can read.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::ValueEnum;

use crate::model::DayRecord;

mod ai_json;
mod ocr;
mod text;
#[cfg(test)]
mod tests;

pub use ai_json::{AiJsonSource, ExtractorRejection, parse_ai_reply};
pub use ocr::{OcrPdfSource, command_available};
pub use text::TextFileSource;

/// What a source produced: raw lines for the row grammar, or rows already split
/// into fields by an AI extractor.
#[derive(Debug, Clone)]
pub enum Extraction {
    Text(String),
    Rows(Vec<DayRecord>),
}

pub trait TimetableSource {
    fn kind(&self) -> SourceKind;

    fn path(&self) -> &Path;

    fn extract(&self) -> Result<Extraction>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum SourceKind {
    Text,
    OcrPdf,
    AiJson,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::OcrPdf => "ocr-pdf",
            Self::AiJson => "ai-json",
        }
    }

    /// Guesses the source kind from a file extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Self::OcrPdf,
            "json" => Self::AiJson,
            _ => Self::Text,
        }
    }
}

pub fn open_source(kind: SourceKind, path: PathBuf, ocr_lang: &str) -> Box<dyn TimetableSource> {
    match kind {
        SourceKind::Text => Box::new(TextFileSource::new(path)),
        SourceKind::OcrPdf => Box::new(OcrPdfSource::new(path, ocr_lang)),
        SourceKind::AiJson => Box::new(AiJsonSource::new(path)),
    }
}
