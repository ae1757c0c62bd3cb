use crate::model::TimeValue;

use super::ParseError;

/// Separator written between hour and minute in canonical times.
pub const CLOCK_SEPARATOR: char = '.';

/// Separator written between alternative times of one cell.
pub const ALTERNATIVE_SEPARATOR: &str = "/";

/// Canonicalizes a raw time cell such as `5:30`, `5.30` or `12.30 / 1.30`.
///
/// Each clock expression becomes `HH.MM`; alternatives keep their order and are joined
/// with [`ALTERNATIVE_SEPARATOR`]. Nothing is rounded and no AM/PM is inferred.
pub fn normalize_time(raw: &str) -> Result<TimeValue, ParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseError::malformed(raw));
    }

    let canonical = if trimmed.contains(ALTERNATIVE_SEPARATOR) {
        trimmed
            .split(ALTERNATIVE_SEPARATOR)
            .map(|part| normalize_clock(part.trim()).ok_or_else(|| ParseError::malformed(raw)))
            .collect::<Result<Vec<String>, ParseError>>()?
            .join(ALTERNATIVE_SEPARATOR)
    } else {
        normalize_clock(trimmed).ok_or_else(|| ParseError::malformed(raw))?
    };

    Ok(TimeValue::from_canonical(canonical))
}

fn normalize_clock(expression: &str) -> Option<String> {
    let mut parts = expression.split(['.', ':']);
    let hour = parts.next()?;
    let minute = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let all_digits = |value: &str| value.bytes().all(|byte| byte.is_ascii_digit());
    if hour.is_empty() || hour.len() > 2 || !all_digits(hour) {
        return None;
    }
    if minute.len() != 2 || !all_digits(minute) {
        return None;
    }

    Some(format!("{hour:0>2}{CLOCK_SEPARATOR}{minute}"))
}
