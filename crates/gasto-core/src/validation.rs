//! Boundary checks applied before anything reaches the store.

use gasto_domain::UNCATEGORIZED_LABEL;

use crate::CoreError;

pub const TITLE_MAX_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Parses a user-typed decimal, accepting either `,` or `.` as separator.
pub fn parse_decimal(input: &str) -> Result<f64, CoreError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("a value is required".into()));
    }
    let value: f64 = trimmed
        .replacen(',', ".", 1)
        .parse()
        .map_err(|_| CoreError::Validation(format!("`{trimmed}` is not a valid number")))?;
    if !value.is_finite() {
        return Err(CoreError::Validation(format!("`{trimmed}` is not a valid number")));
    }
    Ok(value)
}

/// Expense amounts must be strictly positive.
pub fn parse_amount(input: &str) -> Result<f64, CoreError> {
    let value = parse_decimal(input)?;
    validate_amount(value)?;
    Ok(value)
}

pub fn validate_amount(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::Validation(
            "amount must be a number greater than zero".into(),
        ));
    }
    Ok(())
}

/// Category budgets may be zero but never negative.
pub fn parse_budget(input: &str) -> Result<f64, CoreError> {
    let value = parse_decimal(input)?;
    validate_budget(value)?;
    Ok(value)
}

pub fn validate_budget(value: f64) -> Result<(), CoreError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CoreError::Validation(
            "budget must be zero or a positive number".into(),
        ));
    }
    Ok(())
}

/// Trims the title and checks it is present and short enough.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("title is required".into()));
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(CoreError::Validation(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trims the description; blank descriptions become `None`.
pub fn validate_description(description: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = description.map(str::trim).filter(|text| !text.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(CoreError::Validation(format!(
            "description must be at most {DESCRIPTION_MAX_CHARS} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Trims the name; the uncategorized label is reserved in any letter case.
pub fn validate_category_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("category name is required".into()));
    }
    if trimmed.eq_ignore_ascii_case(UNCATEGORIZED_LABEL) {
        return Err(CoreError::Validation(format!(
            "`{UNCATEGORIZED_LABEL}` is reserved for uncategorized expenses"
        )));
    }
    Ok(trimmed.to_string())
}
