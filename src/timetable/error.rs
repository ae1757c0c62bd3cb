use thiserror::Error;

/// Fatal outcomes of parsing and validating one timetable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed time token: {token:?}")]
    MalformedTimeToken { token: String },

    #[error("unknown month: {input:?}")]
    UnknownMonth { input: String },

    #[error("year {year} is outside the supported calendar range")]
    YearOutOfRange { year: i32 },

    #[error("row count mismatch: expected {expected}, found {found}")]
    RowCountMismatch { expected: u32, found: usize },

    #[error("invalid day token: {token:?}")]
    InvalidDayToken { token: String },

    #[error("date sequence broken: {found} follows {prev}")]
    DateSequenceBroken { prev: u8, found: u8 },

    #[error("weekday sequence broken: expected {expected}, found {found}")]
    WeekdaySequenceBroken { expected: String, found: String },
}

impl ParseError {
    pub(crate) fn malformed(token: &str) -> Self {
        Self::MalformedTimeToken {
            token: token.to_string(),
        }
    }
}
