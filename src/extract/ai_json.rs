use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{DayRecord, PrayerWindow, TimeValue};
use crate::timetable::normalize_time;

use super::{Extraction, SourceKind, TimetableSource};

/// Reply of a generative-AI extractor saved to disk: a JSON array of day rows, or a
/// single `{"ERROR": ...}` entry when the document contradicts the target month.
pub struct AiJsonSource {
    path: PathBuf,
}

impl AiJsonSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TimetableSource for AiJsonSource {
    fn kind(&self) -> SourceKind {
        SourceKind::AiJson
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn extract(&self) -> Result<Extraction> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let rows = parse_ai_reply(&raw)
            .with_context(|| format!("failed to parse AI reply {}", self.path.display()))?;
        Ok(Extraction::Rows(rows))
    }
}

/// The extractor looked at the document and refused it, e.g. because the printed month
/// contradicts the target month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("extractor rejected the document: {message}")]
pub struct ExtractorRejection {
    pub message: String,
}

#[derive(Debug, Deserialize)]
struct AiRow {
    date: u8,
    day: String,
    fajr: PrayerWindow,
    #[serde(default)]
    sunrise: Option<TimeValue>,
    dhuhar: PrayerWindow,
    asr: PrayerWindow,
    maghrib: AiMaghrib,
    isha: PrayerWindow,
}

#[derive(Debug, Deserialize)]
struct AiMaghrib {
    start: TimeValue,
    #[serde(default)]
    jamaat: Option<String>,
}

/// Parses an extractor reply into day rows with canonical times.
///
/// Markdown code fences around the JSON are ignored. A missing or empty Maghrib jamaat
/// mirrors the start time.
pub fn parse_ai_reply(raw: &str) -> Result<Vec<DayRecord>> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let value: Value =
        serde_json::from_str(cleaned.trim()).context("AI reply is not valid JSON")?;

    if let Some(message) = value
        .as_array()
        .and_then(|rows| rows.first())
        .and_then(|first| first.get("ERROR"))
    {
        let message = message
            .as_str()
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| message.to_string());
        return Err(ExtractorRejection { message }.into());
    }

    let rows: Vec<AiRow> =
        serde_json::from_value(value).context("AI reply does not match the row layout")?;

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let maghrib = match row.maghrib.jamaat.as_deref().map(str::trim) {
            Some(jamaat) if !jamaat.is_empty() => PrayerWindow {
                start: row.maghrib.start,
                jamaat: normalize_time(jamaat)
                    .with_context(|| format!("maghrib jamaat on date {}", row.date))?,
            },
            _ => PrayerWindow::mirrored(row.maghrib.start),
        };

        records.push(DayRecord {
            date: row.date,
            day: row.day.trim().to_ascii_uppercase(),
            fajr: row.fajr,
            sunrise: row.sunrise,
            dhuhar: row.dhuhar,
            asr: row.asr,
            maghrib,
            isha: row.isha,
        });
    }

    Ok(records)
}
