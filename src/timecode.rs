//! Parsing of time values given on the command line.
//!
//! Accepted forms, all non-negative:
//!
//! | Input | Meaning |
//! |---|---|
//! | `12.5` | seconds |
//! | `01:15` | minutes:seconds |
//! | `00:01:15.5` | hours:minutes:seconds |
//! | `1.02:00:00` | days.hours:minutes:seconds |
//! | `0:00:00:00.0040` | days:hours:minutes:seconds |
//!
//! Fractional seconds are parsed digit by digit (up to nanoseconds), so
//! `0.0040` is exactly 4 ms.

use std::time::Duration;

use crate::error::FrameSplitError;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Parse a time value into a [`Duration`].
///
/// # Errors
///
/// Returns [`FrameSplitError::Configuration`] for empty, negative,
/// malformed, or out-of-range input.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use framesplit::timecode::parse_timecode;
///
/// assert_eq!(parse_timecode("75")?, Duration::from_secs(75));
/// assert_eq!(parse_timecode("01:15")?, Duration::from_secs(75));
/// assert_eq!(parse_timecode("0:00:00:00.0040")?, Duration::from_millis(4));
/// # Ok::<(), framesplit::FrameSplitError>(())
/// ```
pub fn parse_timecode(value: &str) -> Result<Duration, FrameSplitError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(value, "time value cannot be empty"));
    }
    if trimmed.starts_with('-') {
        return Err(invalid(value, "time value cannot be negative"));
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    let (days, hours, minutes, seconds) = match parts.as_slice() {
        [seconds] => (0, 0, 0, *seconds),
        [minutes, seconds] => (0, 0, parse_field(value, minutes)?, *seconds),
        [hours, minutes, seconds] => {
            let (days, hours) = match hours.split_once('.') {
                Some((days, hours)) => (parse_field(value, days)?, parse_field(value, hours)?),
                None => (0, parse_field(value, hours)?),
            };
            (days, hours, parse_field(value, minutes)?, *seconds)
        }
        [days, hours, minutes, seconds] => (
            parse_field(value, days)?,
            parse_field(value, hours)?,
            parse_field(value, minutes)?,
            *seconds,
        ),
        _ => return Err(invalid(value, "too many ':' separated fields")),
    };
    let (seconds, fraction) = parse_seconds(value, seconds)?;

    let whole_seconds = total_seconds(
        value,
        &[
            (days, SECONDS_PER_DAY),
            (hours, SECONDS_PER_HOUR),
            (minutes, SECONDS_PER_MINUTE),
            (seconds, 1),
        ],
    )?;
    Ok(Duration::new(whole_seconds, fraction))
}

/// Sum of `amount * unit` over all fields, rejecting overflow.
fn total_seconds(value: &str, fields: &[(u64, u64)]) -> Result<u64, FrameSplitError> {
    fields
        .iter()
        .try_fold(0u64, |total, &(amount, unit)| {
            amount
                .checked_mul(unit)
                .and_then(|seconds| total.checked_add(seconds))
        })
        .ok_or_else(|| invalid(value, "time value is too large"))
}

fn parse_field(value: &str, field: &str) -> Result<u64, FrameSplitError> {
    if field.is_empty() || !field.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid(value, &format!("{field:?} is not a whole number")));
    }
    field
        .parse::<u64>()
        .map_err(|error| invalid(value, &error.to_string()))
}

/// Split `ss[.fffffffff]` into whole seconds and nanoseconds.
fn parse_seconds(value: &str, field: &str) -> Result<(u64, u32), FrameSplitError> {
    let (whole, fraction) = field.split_once('.').unwrap_or((field, ""));
    let whole = if whole.is_empty() && !fraction.is_empty() {
        0
    } else {
        parse_field(value, whole)?
    };

    if !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(invalid(value, &format!("{field:?} has a malformed fraction")));
    }
    let nanos = fraction
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));

    Ok((whole, nanos))
}

fn invalid(value: &str, reason: &str) -> FrameSplitError {
    FrameSplitError::Configuration(format!("invalid time value {value:?}: {reason}"))
}
