//! # HTTP API Errors
//!
//! Maps store and validation failures to status codes:
//!
//! | failure                    | status |
//! |----------------------------|--------|
//! | validation / bad body      | 400    |
//! | NotFound                   | 404    |
//! | DuplicateEntry, Conflict   | 409    |
//! | IoFailure, CorruptData     | 500    |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::observability::{Event, Logger, Severity};
use crate::schema::{SchemaError, ValidationDetails};
use crate::store::{StoreError, StoreErrorCode};

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Candidate movie failed schema validation
    #[error("Invalid movie: {0}")]
    Validation(#[from] SchemaError),

    /// Body is not JSON
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Store operation failed; `context` is the client-facing message
    #[error("{context}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// `map_err` adapter attaching a client-facing message to a store error
    pub fn store(context: impl Into<String>) -> impl FnOnce(StoreError) -> Self {
        let context = context.into();
        move |source| ApiError::Store { context, source }
    }

    /// Whether the underlying store failure is `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Store { source, .. } if source.is_not_found())
    }

    /// Replace the client-facing message of a store error; other errors
    /// pass through unchanged
    pub fn with_store_context(self, context: impl Into<String>) -> Self {
        match self {
            ApiError::Store { source, .. } => ApiError::Store {
                context: context.into(),
                source,
            },
            other => other,
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Store { source, .. } => match source.code() {
                StoreErrorCode::NotFound => StatusCode::NOT_FOUND,
                StoreErrorCode::DuplicateEntry | StoreErrorCode::Conflict => StatusCode::CONFLICT,
                StoreErrorCode::IoFailure | StoreErrorCode::CorruptData => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Machine-readable code of the underlying failure
    pub fn code_str(&self) -> &'static str {
        match self {
            ApiError::Validation(e) => e.code().code(),
            ApiError::InvalidBody(_) => "MOVIE_API_INVALID_BODY",
            ApiError::Store { source, .. } => source.code().code(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ValidationDetails>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let details = match err {
            ApiError::Validation(e) => e.details().to_vec(),
            _ => Vec::new(),
        };
        // 5xx bodies carry the store's own message, as there is no better one
        let error = match err {
            ApiError::Store { source, .. } if err.status_code().is_server_error() => {
                source.message().to_string()
            }
            _ => err.to_string(),
        };
        Self {
            error,
            code: err.status_code().as_u16(),
            kind: err.code_str(),
            details,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(source: StoreError) -> Self {
        ApiError::Store {
            context: source.message().to_string(),
            source,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::from(&self);
        let status_str = status.as_u16().to_string();
        let fields = [
            ("code", body.kind),
            ("error", body.error.as_str()),
            ("status", status_str.as_str()),
        ];

        if status.is_server_error() {
            Logger::log(Severity::Error, Event::RequestFailed.as_str(), &fields);
        } else {
            Logger::log(Severity::Info, Event::RequestRejected.as_str(), &fields);
        }

        (status, Json(body)).into_response()
    }
}
