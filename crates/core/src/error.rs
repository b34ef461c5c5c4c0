use serde::Serialize;

use crate::types::DbId;

/// A single field-level failure, reported to clients as `{field, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Closed set of domain failures. The HTTP layer maps each variant to exactly
/// one status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<FieldError>),

    /// An `If-Match` precondition did not hold, either at the in-process check
    /// or at the conditional write.
    #[error("{entity} with id {id} was modified by another request")]
    VersionConflict { entity: &'static str, id: DbId },

    /// Duplicate-key style conflicts (unique constraints).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A stored resource violates a structural invariant (e.g. no timestamps).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a validation failure on a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation(vec![FieldError::new(field, message)])
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
