//! Validation Utilities

use validator::ValidationErrors;

use super::error::AppError;

/// Flatten validation errors into one `Validation` message, one
/// `field: message` entry per failure, ordered by field name.
pub fn validation_error(errors: ValidationErrors) -> AppError {
    let mut failures: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid value ({})", field, e.code),
            })
        })
        .collect();
    failures.sort();

    if failures.is_empty() {
        return AppError::Validation("request body failed validation".into());
    }
    AppError::Validation(failures.join("; "))
}
