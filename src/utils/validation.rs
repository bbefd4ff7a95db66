//! Validation utilities

use crate::types::*;
use crate::utils::normalize::strip_separators;

/// Check the syntax of a user-supplied identifier
///
/// Only separators are removed before checking, so letters or punctuation
/// typed into a consumer identifier are rejected rather than silently
/// dropped. Blank input is a missing field.
pub fn validate(raw: &str, class: IdentifierClass) -> LookupResult<()> {
    if raw.trim().is_empty() {
        return Err(LookupError::MissingField(class.label().to_string()));
    }

    let candidate = strip_separators(raw);

    if !candidate.chars().all(|c| class.accepts(c)) || !class.has_valid_length(&candidate) {
        return Err(LookupError::InvalidFormat(format_requirement(class)));
    }

    Ok(())
}

/// Validate a consumer identifier
pub fn validate_consumer_identifier(raw: &str) -> LookupResult<()> {
    validate(raw, IdentifierClass::ConsumerIdentifier)
}

/// Validate a reference number
pub fn validate_reference_number(raw: &str) -> LookupResult<()> {
    validate(raw, IdentifierClass::ReferenceNumber)
}

/// Validate and describe the outcome in a form-friendly message
pub fn validate_identifier(raw: &str, class: IdentifierClass) -> ValidationReport {
    match validate(raw, class) {
        Ok(()) => ValidationReport {
            valid: true,
            message: match class {
                IdentifierClass::ConsumerIdentifier => "Valid consumer ID format".to_string(),
                IdentifierClass::ReferenceNumber => "Valid reference number format".to_string(),
            },
        },
        Err(LookupError::MissingField(label)) => ValidationReport {
            valid: false,
            message: format!("{label} is required"),
        },
        Err(_) => ValidationReport {
            valid: false,
            message: format_requirement(class),
        },
    }
}

fn format_requirement(class: IdentifierClass) -> String {
    let (min, max) = class.length_bounds();
    match class {
        IdentifierClass::ConsumerIdentifier => {
            format!("{} must be {min}-{max} digits", class.label())
        }
        IdentifierClass::ReferenceNumber => {
            format!(
                "{} must be {min}-{max} alphanumeric characters",
                class.label()
            )
        }
    }
}
