//! Evaluation request body checks.

use serde_json::Value;

use crate::error::InputError;
use crate::infrastructure::config::input::InputConfig;

/// JSON field carrying the requirement text.
pub const REQUIREMENT_FIELD: &str = "requirementText";

/// Extract the requirement text from a raw request body.
///
/// Checks run in order and the first failure wins. The returned text is
/// trimmed. The minimum length applies to the trimmed text, the maximum to
/// the raw text; both count characters, not bytes.
///
/// # Errors
///
/// Returns the [`InputError`] describing the first failed check.
pub fn parse_requirement(body: Option<&str>, limits: &InputConfig) -> Result<String, InputError> {
    let body = body.filter(|b| !b.is_empty()).ok_or(InputError::BodyRequired)?;
    let value: Value = serde_json::from_str(body).map_err(|_| InputError::InvalidJson)?;

    let object = value
        .as_object()
        .filter(|o| !o.is_empty())
        .ok_or(InputError::EmptyBody)?;

    let raw = object.get(REQUIREMENT_FIELD).ok_or(InputError::MissingText)?;
    let raw = raw.as_str().ok_or(InputError::NotAString)?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Blank);
    }
    if trimmed.chars().count() < limits.min_length {
        return Err(InputError::TooShort {
            min: limits.min_length,
        });
    }
    if raw.chars().count() > limits.max_length {
        return Err(InputError::TooLong {
            max: limits.max_length,
        });
    }

    Ok(trimmed.to_string())
}
