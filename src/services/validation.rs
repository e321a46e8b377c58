//! Field rules applied before anything reaches a repository

use chrono::{Datelike, NaiveDate};

use super::ServiceError;

pub const MIN_AGE: i32 = 0;
pub const MAX_AGE: i32 = 150;
/// Year of the earliest surviving motion picture
pub const MIN_RELEASE_YEAR: i32 = 1888;
/// Announced releases are accepted this many years ahead
pub const RELEASE_YEAR_HORIZON: i32 = 10;
pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

pub fn require_text(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

pub fn require_positive_id(field: &str, id: i32) -> Result<(), ServiceError> {
    if id <= 0 {
        return Err(ServiceError::BadRequest(format!(
            "{} must be positive, got {}",
            field, id
        )));
    }
    Ok(())
}

pub fn require_positive_ids<'a>(
    field: &str,
    ids: impl IntoIterator<Item = &'a i32>,
) -> Result<(), ServiceError> {
    ids.into_iter()
        .try_for_each(|&id| require_positive_id(field, id))
}

pub fn validate_age(age: Option<i32>) -> Result<(), ServiceError> {
    match age {
        Some(age) if !(MIN_AGE..=MAX_AGE).contains(&age) => Err(ServiceError::BadRequest(
            format!("age must be between {} and {}, got {}", MIN_AGE, MAX_AGE, age),
        )),
        _ => Ok(()),
    }
}

pub fn validate_release_date(
    release_date: Option<NaiveDate>,
    current_year: i32,
) -> Result<(), ServiceError> {
    let Some(date) = release_date else {
        return Ok(());
    };
    let max_year = current_year + RELEASE_YEAR_HORIZON;
    if !(MIN_RELEASE_YEAR..=max_year).contains(&date.year()) {
        return Err(ServiceError::BadRequest(format!(
            "release year must be between {} and {}, got {}",
            MIN_RELEASE_YEAR,
            max_year,
            date.year()
        )));
    }
    Ok(())
}

pub fn validate_rating(rating: Option<f64>) -> Result<(), ServiceError> {
    match rating {
        Some(r) if !(MIN_RATING..=MAX_RATING).contains(&r) => Err(ServiceError::BadRequest(
            format!("rating must be between {} and {}, got {}", MIN_RATING, MAX_RATING, r),
        )),
        _ => Ok(()),
    }
}

/// ISO-639-1 style: two or three ASCII letters
pub fn validate_language(language: Option<&str>) -> Result<(), ServiceError> {
    let Some(code) = language else {
        return Ok(());
    };
    let valid = (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic());
    if !valid {
        return Err(ServiceError::BadRequest(format!(
            "original_language must be a 2-3 letter code, got {:?}",
            code
        )));
    }
    Ok(())
}

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}
