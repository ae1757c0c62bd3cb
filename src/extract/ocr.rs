use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::info;

use super::{Extraction, SourceKind, TimetableSource};

const RENDER_DPI: u32 = 300;

/// Tesseract page segmentation mode for a single uniform block of text, which keeps
/// each printed table row on one output line.
const TESSERACT_PSM: &str = "6";

/// First page of a scanned PDF, rendered with `pdftoppm` and read with `tesseract`.
pub struct OcrPdfSource {
    path: PathBuf,
    ocr_lang: String,
}

impl OcrPdfSource {
    pub fn new(path: PathBuf, ocr_lang: &str) -> Self {
        Self {
            path,
            ocr_lang: ocr_lang.to_string(),
        }
    }
}

impl TimetableSource for OcrPdfSource {
    fn kind(&self) -> SourceKind {
        SourceKind::OcrPdf
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> Result<Extraction> {
        for program in ["pdftoppm", "tesseract"] {
            if !command_available(program) {
                bail!("{program} is not available; install poppler-utils and tesseract-ocr");
            }
        }

        let text = ocr_first_page(&self.path, &self.ocr_lang)?;
        info!(
            path = %self.path.display(),
            chars = text.chars().filter(|character| !character.is_whitespace()).count(),
            "OCR text extracted"
        );
        Ok(Extraction::Text(text))
    }
}

pub fn command_available(program: &str) -> bool {
    Command::new(program).arg("--version").output().is_ok()
}

fn ocr_first_page(pdf_path: &Path, ocr_lang: &str) -> Result<String> {
    let safe_stem = pdf_path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("timetable")
        .chars()
        .map(|character| {
            if character.is_ascii_alphanumeric() {
                character
            } else {
                '_'
            }
        })
        .collect::<String>();

    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let output_root = std::env::temp_dir().join(format!(
        "timetable_ocr_{}_{}_{}",
        safe_stem,
        std::process::id(),
        stamp
    ));
    let png_path = PathBuf::from(format!("{}.png", output_root.display()));

    let pdftoppm_output = Command::new("pdftoppm")
        .arg("-f")
        .arg("1")
        .arg("-l")
        .arg("1")
        .arg("-singlefile")
        .arg("-png")
        .arg("-r")
        .arg(RENDER_DPI.to_string())
        .arg(pdf_path)
        .arg(&output_root)
        .output()
        .with_context(|| format!("failed to execute pdftoppm for {}", pdf_path.display()))?;

    if !pdftoppm_output.status.success() {
        let stderr = String::from_utf8_lossy(&pdftoppm_output.stderr);
        bail!(
            "pdftoppm returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    if !png_path.exists() {
        bail!(
            "pdftoppm did not produce expected image for {}",
            pdf_path.display()
        );
    }

    let tesseract_output = Command::new("tesseract")
        .arg(&png_path)
        .arg("stdout")
        .arg("--psm")
        .arg(TESSERACT_PSM)
        .arg("-l")
        .arg(ocr_lang)
        .output();

    let _ = fs::remove_file(&png_path);

    let tesseract_output = tesseract_output
        .with_context(|| format!("failed to execute tesseract for {}", png_path.display()))?;

    if !tesseract_output.status.success() {
        let stderr = String::from_utf8_lossy(&tesseract_output.stderr);
        bail!(
            "tesseract returned non-zero exit status for {}: {}",
            pdf_path.display(),
            stderr.trim()
        );
    }

    Ok(String::from_utf8_lossy(&tesseract_output.stdout).replace('\u{0000}', ""))
}
