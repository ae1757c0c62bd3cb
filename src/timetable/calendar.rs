use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};

use super::ParseError;

pub const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const DAY_CODES: [(&str, Weekday); 7] = [
    ("MON", Weekday::Mon),
    ("TUE", Weekday::Tue),
    ("WED", Weekday::Wed),
    ("THU", Weekday::Thu),
    ("FRI", Weekday::Fri),
    ("SAT", Weekday::Sat),
    ("SUN", Weekday::Sun),
];

/// A target month as supplied by the caller: a number or an English name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthInput {
    Number(u32),
    Name(String),
}

impl MonthInput {
    /// Resolves to a 1-based month number.
    pub fn resolve(&self) -> Result<u32, ParseError> {
        match self {
            Self::Number(number) if (1..=12).contains(number) => Ok(*number),
            Self::Number(number) => Err(ParseError::UnknownMonth {
                input: number.to_string(),
            }),
            Self::Name(name) => {
                let lower = name.trim().to_lowercase();
                MONTH_NAMES
                    .iter()
                    .position(|candidate| *candidate == lower)
                    .map(|index| index as u32 + 1)
                    .ok_or_else(|| ParseError::UnknownMonth {
                        input: name.clone(),
                    })
            }
        }
    }
}

impl FromStr for MonthInput {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(value))
    }
}

impl From<u32> for MonthInput {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}

/// Digits become a month number; anything else is kept as a name.
impl From<&str> for MonthInput {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.parse::<u32>() {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Name(trimmed.to_string()),
        }
    }
}

impl fmt::Display for MonthInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Number of days in `month` (1-based) of `year`, proleptic Gregorian.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, ParseError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next_first = if month == 12 {
        year.checked_add(1)
            .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, 1, 1))
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    match (first, next_first) {
        (Some(first), Some(next_first)) => Ok((next_first - first).num_days() as u32),
        _ => Err(ParseError::YearOutOfRange { year }),
    }
}

pub fn parse_day_code(token: &str) -> Option<Weekday> {
    DAY_CODES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(token.trim()))
        .map(|(_, weekday)| *weekday)
}

pub fn day_code(weekday: Weekday) -> &'static str {
    DAY_CODES[weekday.num_days_from_monday() as usize].0
}

/// Weekday the calendar assigns to `date` of the given month, if that date exists.
pub fn calendar_weekday(year: i32, month: u32, date: u8) -> Option<Weekday> {
    NaiveDate::from_ymd_opt(year, month, u32::from(date)).map(|value| value.weekday())
}
