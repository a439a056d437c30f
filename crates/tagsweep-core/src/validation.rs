//! Validation utilities.

use crate::FieldError;
use validator::ValidationErrors;

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect()
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that no tag in a list is blank.
    #[allow(clippy::ptr_arg)]
    pub fn no_blank_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
        if tags.iter().any(|tag| tag.trim().is_empty()) {
            let mut error = ValidationError::new("blank_tag");
            error.message = Some("Tags must not be blank".into());
            return Err(error);
        }
        Ok(())
    }
}
