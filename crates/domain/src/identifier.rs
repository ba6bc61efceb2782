use sion_core::{AppError, AppResult, NonEmptyString};

/// Validates a value usable as a document id in a store collection.
///
/// Document ids are path segments, so they cannot contain `/` and cannot be
/// the relative segments `.` or `..`.
pub(crate) fn document_id(kind: &str, value: impl Into<String>) -> AppResult<NonEmptyString> {
    let value = NonEmptyString::new(value)
        .map_err(|_| AppError::Validation(format!("{kind} id must not be empty")))?;

    if value.as_str() != value.as_str().trim() {
        return Err(AppError::Validation(format!(
            "{kind} id '{value}' must not have surrounding whitespace"
        )));
    }

    if value.as_str().contains('/') {
        return Err(AppError::Validation(format!(
            "{kind} id '{value}' must not contain '/'"
        )));
    }

    if matches!(value.as_str(), "." | "..") {
        return Err(AppError::Validation(format!(
            "{kind} id '{value}' is reserved"
        )));
    }

    Ok(value)
}
