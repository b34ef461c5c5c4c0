use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::error::{CoreError, FieldError};
use serde::Serialize;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{message, errors}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `catalog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A malformed request (unparseable body, wrong JSON shape).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A write arrived without `If-Match` while it is mandatory.
    #[error("Precondition required: {0}")]
    PreconditionRequired(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Error envelope sent to clients.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub errors: Vec<FieldError>,
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                    Vec::new(),
                ),
                CoreError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_string(),
                    errors,
                ),
                err @ CoreError::VersionConflict { .. } => (
                    StatusCode::PRECONDITION_FAILED,
                    format!("{err}; fetch the current version and retry"),
                    Vec::new(),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
                CoreError::InvalidState(msg) => {
                    tracing::error!(error = %msg, "Resource in invalid state");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_MESSAGE.to_string(),
                        Vec::new(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_MESSAGE.to_string(),
                        Vec::new(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad request".to_string(),
                vec![FieldError::new("body", msg)],
            ),
            AppError::PreconditionRequired(msg) => {
                (StatusCode::PRECONDITION_REQUIRED, msg, Vec::new())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                    Vec::new(),
                )
            }
        };

        (status, axum::Json(ErrorBody { message, errors })).into_response()
    }
}
