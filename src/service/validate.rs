//! Required-field checks shared by the services

use crate::error::AppError;

/// Trim a required field, rejecting blank or oversized values
pub fn required(field: &str, value: &str, max_chars: usize) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} cannot be empty.", field)));
    }
    if trimmed.chars().count() > max_chars {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters.",
            field, max_chars
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field; blank becomes `None`
pub fn optional(
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) if v.chars().count() > max_chars => Err(AppError::validation(format!(
            "{} must be at most {} characters.",
            field, max_chars
        ))),
        Some(v) => Ok(Some(v.to_string())),
    }
}
