use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{Extraction, SourceKind, TimetableSource};

/// Text that was OCR'd or typed up elsewhere.
pub struct TextFileSource {
    path: PathBuf,
}

impl TextFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TimetableSource for TextFileSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Text
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> Result<Extraction> {
        let raw = fs::read(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        Ok(Extraction::Text(
            String::from_utf8_lossy(&raw).replace('\u{0000}', ""),
        ))
    }
}
