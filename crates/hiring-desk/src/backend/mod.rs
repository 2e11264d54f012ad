//! In-process stand-in for the hiring REST backend, used by the demo server and the tests.

mod memory;
mod router;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

use crate::client::{ApiError, Page};
use crate::hiring::validation::ValidationErrors;

pub use memory::MemoryBackend;
pub use router::hiring_router;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("Not found.")]
    NotFound,
    /// Lookup that has its own not-found message.
    #[error("{0}")]
    Missing(String),
    /// The request is well-formed but breaks a workflow rule.
    #[error("{0}")]
    Rejected(String),
    #[error("{}", describe(.0))]
    Invalid(ValidationErrors),
}

impl BackendError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::Invalid(ValidationErrors::from([(field.to_string(), message.into())]))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::Missing(_) => StatusCode::NOT_FOUND,
            Self::Rejected(_) | Self::Invalid(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// JSON body sent with the error status.
    pub fn body(&self) -> Value {
        match self {
            Self::NotFound => json!({ "detail": self.to_string() }),
            Self::Missing(message) | Self::Rejected(message) => json!({ "error": message }),
            Self::Invalid(errors) => json!(errors),
        }
    }
}

/// Whole collection as one page of the list envelope.
pub(crate) fn single_page<T>(results: Vec<T>) -> Page<T> {
    Page {
        count: results.len(),
        next: None,
        previous: None,
        results,
    }
}

fn describe(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        (self.status(), axum::Json(self.body())).into_response()
    }
}

/// Same message the caller would read from the HTTP response.
impl From<BackendError> for ApiError {
    fn from(value: BackendError) -> Self {
        ApiError::from_response(value.status().as_u16(), &value.body().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_process_errors_read_like_http_errors() {
        let error = ApiError::from(BackendError::rejected("Only pending offers can be accepted"));
        assert_eq!(error.status(), Some(400));
        assert_eq!(error.to_string(), "Only pending offers can be accepted");

        let error = ApiError::from(BackendError::NotFound);
        assert_eq!(error.to_string(), "Not found.");
        assert!(error.is_not_found());
    }

    #[test]
    fn field_errors_keep_the_field_map() {
        let error = BackendError::invalid("req_id", "Invalid requisition ID format");
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.body(), json!({"req_id": "Invalid requisition ID format"}));
        assert_eq!(error.to_string(), "req_id: Invalid requisition ID format");
    }
}
