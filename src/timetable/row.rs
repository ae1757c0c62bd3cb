use regex::Regex;
use tracing::debug;

use crate::model::{DayRecord, LineStats, PrayerWindow, TimeValue};

use super::{MaghribJamaat, ParseError, ParseOptions, normalize_time};

const TIME_CELL: &str = r"\d{1,2}[:.]\d{2}(?:\s*/\s*\d{1,2}[:.]\d{2})?";

/// Time cells in a row whose Maghrib jamaat mirrors the start column.
pub const MIRRORED_ROW_CELLS: usize = 11;

/// Time cells in a row with a dedicated Maghrib jamaat column.
pub const COLUMN_ROW_CELLS: usize = 12;

const HEADER_PREFIXES: [&str; 3] = ["date", "day", "begins"];

/// Grammar for one printed timetable row, matched as a prefix of the line:
/// `date day fajr fajr-jamaat sunrise dhahwa dhuhar dhuhar-jamaat asr asr-jamaat
/// maghrib [maghrib-jamaat] isha isha-jamaat`.
///
/// Whatever follows the last cell is OCR residue and ignored, unless it continues the
/// last cell or starts another time cell.
pub struct RowMatcher {
    grammars: Vec<(usize, Regex)>,
    next_cell: Regex,
    include_sunrise: bool,
}

impl RowMatcher {
    pub fn new(options: &ParseOptions) -> Self {
        let cell_counts: &[usize] = match options.maghrib_jamaat {
            MaghribJamaat::Auto => &[COLUMN_ROW_CELLS, MIRRORED_ROW_CELLS],
            MaghribJamaat::MirrorStart => &[MIRRORED_ROW_CELLS],
            MaghribJamaat::Column => &[COLUMN_ROW_CELLS],
        };

        let grammars = cell_counts
            .iter()
            .map(|&cells| (cells, row_regex(cells)))
            .collect();

        Self {
            grammars,
            next_cell: Regex::new(&format!(r"^(?:\d|\s+{TIME_CELL})"))
                .expect("valid trailing cell regex"),
            include_sunrise: options.include_sunrise,
        }
    }

    /// Parses one line. `Ok(None)` covers blank, header and unrecognized lines.
    pub fn match_line(&self, line: &str) -> Result<Option<DayRecord>, ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || is_header_line(trimmed) {
            return Ok(None);
        }

        for (cells, regex) in &self.grammars {
            let Some(captures) = regex.captures(trimmed) else {
                continue;
            };
            let rest = captures.get(0).map_or("", |value| &trimmed[value.end()..]);
            if self.next_cell.is_match(rest) {
                continue;
            }

            let Some(date) = captures
                .get(1)
                .and_then(|value| value.as_str().parse::<u8>().ok())
                .filter(|value| (1..=31).contains(value))
            else {
                return Ok(None);
            };
            let day = captures
                .get(2)
                .map(|value| value.as_str().to_ascii_uppercase())
                .unwrap_or_default();

            let mut times = Vec::with_capacity(*cells);
            for index in 0..*cells {
                let raw = captures
                    .get(index + 3)
                    .map(|value| value.as_str())
                    .unwrap_or_default();
                times.push(normalize_time(raw)?);
            }

            return Ok(self.assemble(date, day, &times));
        }

        Ok(None)
    }

    /// Runs every line through the matcher, keeping source order.
    pub fn match_text(&self, text: &str) -> Result<(Vec<DayRecord>, LineStats), ParseError> {
        let mut rows = Vec::new();
        let mut stats = LineStats::default();

        for (index, line) in text.lines().enumerate() {
            stats.lines_total += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                stats.blank_lines += 1;
                continue;
            }
            if is_header_line(trimmed) {
                stats.header_lines += 1;
                continue;
            }

            match self.match_line(trimmed)? {
                Some(row) => {
                    stats.matched_rows += 1;
                    rows.push(row);
                }
                None => {
                    stats.dropped_lines += 1;
                    debug!(line = index + 1, text = %trimmed, "dropped unrecognized line");
                }
            }
        }

        Ok((rows, stats))
    }

    fn assemble(&self, date: u8, day: String, times: &[TimeValue]) -> Option<DayRecord> {
        let [
            fajr_start,
            fajr_jamaat,
            sunrise,
            _dhahwa,
            dhuhar_start,
            dhuhar_jamaat,
            asr_start,
            asr_jamaat,
            maghrib_start,
            tail @ ..,
        ] = times
        else {
            return None;
        };

        let (maghrib, isha_start, isha_jamaat) = match tail {
            [maghrib_jamaat, isha_start, isha_jamaat] => (
                PrayerWindow {
                    start: maghrib_start.clone(),
                    jamaat: maghrib_jamaat.clone(),
                },
                isha_start,
                isha_jamaat,
            ),
            [isha_start, isha_jamaat] => (
                PrayerWindow::mirrored(maghrib_start.clone()),
                isha_start,
                isha_jamaat,
            ),
            _ => return None,
        };

        Some(DayRecord {
            date,
            day,
            fajr: PrayerWindow {
                start: fajr_start.clone(),
                jamaat: fajr_jamaat.clone(),
            },
            sunrise: self.include_sunrise.then(|| sunrise.clone()),
            dhuhar: PrayerWindow {
                start: dhuhar_start.clone(),
                jamaat: dhuhar_jamaat.clone(),
            },
            asr: PrayerWindow {
                start: asr_start.clone(),
                jamaat: asr_jamaat.clone(),
            },
            maghrib,
            isha: PrayerWindow {
                start: isha_start.clone(),
                jamaat: isha_jamaat.clone(),
            },
        })
    }
}

fn is_header_line(trimmed: &str) -> bool {
    let lower = trimmed.to_lowercase();
    HEADER_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

fn row_regex(cells: usize) -> Regex {
    let mut pattern = String::from(r"^(\d{1,2})\s+([A-Za-z]{3})");
    for _ in 0..cells {
        pattern.push_str(r"\s+(");
        pattern.push_str(TIME_CELL);
        pattern.push(')');
    }
    Regex::new(&pattern).expect("valid timetable row regex")
}
