//! Input validation for activity sets.
//!
//! Checks structural integrity of activities at the ingestion boundary,
//! before weighting. Detects:
//! - Missing required fields (empty IDs, absent dates or costs in raw records)
//! - Unparsable dates
//! - Inverted spans (start after end)
//! - Negative or non-finite planned costs
//! - Duplicate IDs
//!
//! All problems are collected; validation does not stop at the first one.

use std::collections::HashSet;

use crate::models::Activity;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A rejected activity record.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending activity ID (or `#<row>` when the ID itself is missing).
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A required field is null or empty.
    MissingField,
    /// A date field could not be parsed.
    InvalidDate,
    /// `start_date` is after `end_date`.
    InvertedSpan,
    /// Planned cost is negative, NaN or infinite.
    InvalidCost,
    /// Two activities share the same ID.
    DuplicateId,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(
        kind: ValidationErrorKind,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Validates a single activity.
///
/// Appends every problem found to `errors`.
pub(crate) fn check_activity(activity: &Activity, errors: &mut Vec<ValidationError>) {
    if activity.id.trim().is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingField,
            &activity.id,
            format!("Activity '{}' has an empty ID", activity.name),
        ));
    }

    if activity.start_date > activity.end_date {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvertedSpan,
            &activity.id,
            format!(
                "Activity '{}' starts {} after it ends {}",
                activity.id, activity.start_date, activity.end_date
            ),
        ));
    }

    if !activity.planned_cost.is_finite() || activity.planned_cost < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidCost,
            &activity.id,
            format!(
                "Activity '{}' has invalid planned cost {}",
                activity.id, activity.planned_cost
            ),
        ));
    }
}

/// Validates a set of activities.
///
/// Checks:
/// 1. Every activity has a non-empty ID
/// 2. No duplicate activity IDs
/// 3. `start_date <= end_date`
/// 4. Planned cost is finite and non-negative
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_activities(activities: &[Activity]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for activity in activities {
        check_activity(activity, &mut errors);

        if !ids.insert(activity.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &activity.id,
                format!("Duplicate activity ID: {}", activity.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
