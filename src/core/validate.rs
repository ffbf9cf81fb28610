//! Field validators shared by every tool's command handlers.
//!
//! Each returns a `ValidationError` naming the field; callers abort the
//! command before touching the store.

use crate::core::error::DeskError;
use crate::core::time::{DATE_FORMAT, TIME_FORMAT};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

static MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").unwrap());

static YEAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());

/// Release years accepted for a movie.
pub const YEAR_RANGE: std::ops::RangeInclusive<u16> = 1800..=9999;

/// Trim and reject blank values.
pub fn require_non_empty(field: &str, value: &str) -> Result<String, DeskError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DeskError::ValidationError(format!(
            "{} cannot be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// `None` for a blank or absent update field, meaning "keep current value".
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn parse_positive_f64(field: &str, value: &str) -> Result<f64, DeskError> {
    let parsed: f64 = value.trim().parse().map_err(|_| {
        DeskError::ValidationError(format!("{} must be a number > 0", field))
    })?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(DeskError::ValidationError(format!(
            "{} must be a number > 0",
            field
        )));
    }
    Ok(parsed)
}

pub fn parse_positive_u32(field: &str, value: &str) -> Result<u32, DeskError> {
    let parsed: u32 = value.trim().parse().map_err(|_| {
        DeskError::ValidationError(format!("{} must be a whole number > 0", field))
    })?;
    if parsed == 0 {
        return Err(DeskError::ValidationError(format!(
            "{} must be a whole number > 0",
            field
        )));
    }
    Ok(parsed)
}

pub fn parse_hhmm(value: &str) -> Result<NaiveTime, DeskError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| {
        DeskError::ValidationError(format!("invalid time '{}', expected HH:MM", value))
    })
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DeskError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        DeskError::ValidationError(format!("invalid date '{}', expected YYYY-MM-DD", value))
    })
}

/// Validate a `YYYY-MM` month and return it trimmed.
pub fn parse_month(value: &str) -> Result<String, DeskError> {
    let trimmed = value.trim();
    if !MONTH_PATTERN.is_match(trimmed) {
        return Err(DeskError::ValidationError(format!(
            "invalid month '{}', expected YYYY-MM",
            value
        )));
    }
    Ok(trimmed.to_string())
}

pub fn parse_year(value: &str) -> Result<u16, DeskError> {
    let trimmed = value.trim();
    if !YEAR_PATTERN.is_match(trimmed) {
        return Err(DeskError::ValidationError(
            "year must be a number".to_string(),
        ));
    }
    let year: u16 = trimmed
        .parse()
        .map_err(|_| DeskError::ValidationError("year must be a number".to_string()))?;
    if !YEAR_RANGE.contains(&year) {
        return Err(DeskError::ValidationError(format!(
            "year must be between {} and {}",
            YEAR_RANGE.start(),
            YEAR_RANGE.end()
        )));
    }
    Ok(year)
}

pub fn parse_rating(value: &str) -> Result<f64, DeskError> {
    let rating: f64 = value
        .trim()
        .parse()
        .map_err(|_| DeskError::ValidationError("rating must be a number".to_string()))?;
    if !(0.0..=5.0).contains(&rating) {
        return Err(DeskError::ValidationError(
            "rating must be between 0 and 5".to_string(),
        ));
    }
    Ok(rating)
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
