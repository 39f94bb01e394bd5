//! Error taxonomy for curve computation.
//!
//! Three categories, none of them retryable:
//!
//! | Variant | Cause | Raised by |
//! |---------|-------|-----------|
//! | `Config` | Invalid static configuration | calendar, weighting, assembly |
//! | `Computation` | Invalid intermediate value (zero duration, overflow) | weighting |
//! | `Data` | Malformed activity records | ingestion boundary, before weighting |
//!
//! Every variant carries the identifier of the offending entity.

use thiserror::Error;

use crate::validation::ValidationError;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CurveError>;

/// Errors raised while building an S-curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// Invalid static configuration.
    #[error("configuration error in '{entity}': {message}")]
    Config {
        /// Configuration entity at fault (e.g. `calendar`, `project_cost`).
        entity: String,
        /// Human-readable description.
        message: String,
    },
    /// An activity produced an invalid intermediate value.
    #[error("computation error for activity '{activity_id}': {message}")]
    Computation {
        /// Offending activity ID.
        activity_id: String,
        /// Human-readable description.
        message: String,
    },
    /// One or more activity records were rejected at the ingestion boundary.
    #[error("{} malformed activity record(s): {}", .0.len(), join_messages(.0))]
    Data(Vec<ValidationError>),
}

impl CurveError {
    pub(crate) fn config(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            entity: entity.into(),
            message: message.into(),
        }
    }

    pub(crate) fn computation(activity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Computation {
            activity_id: activity_id.into(),
            message: message.into(),
        }
    }

    /// Identifier of the entity this error is about.
    ///
    /// For `Data` errors this is the first rejected record.
    pub fn entity_id(&self) -> &str {
        match self {
            Self::Config { entity, .. } => entity,
            Self::Computation { activity_id, .. } => activity_id,
            Self::Data(errors) => errors.first().map(|e| e.entity_id.as_str()).unwrap_or(""),
        }
    }
}

impl From<Vec<ValidationError>> for CurveError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Data(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
