//! Turns OCR or AI extracted prayer timetables into validated monthly schedules.
//!
//! [`timetable`] holds the pure parser and validator. [`extract`] wraps the document
//! sources and [`store`] persists accepted schedules keyed by (year, month).

pub mod extract;
pub mod model;
pub mod store;
pub mod timetable;
pub mod util;

pub use model::{DayRecord, PrayerWindow, Schedule, TimeValue};
pub use timetable::{MaghribJamaat, MonthInput, ParseError, ParseOptions, parse_and_validate};
