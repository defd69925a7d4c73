// Lab service error types
use serde_json::{json, Value};
use thiserror::Error;

use crate::database::repository::RepositoryError;

/// Failure of a lab operation. Terminal for the current call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabError {
    /// Caller lacks the role or ownership the operation requires
    #[error("{0}")]
    Unauthorized(String),

    /// Referenced lab does not exist (raised by the service itself)
    #[error("{0}")]
    NotFound(String),

    /// Collaborator failure, passed through unchanged
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl LabError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        LabError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        LabError::NotFound(message.into())
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LabError::Unauthorized(_) => "UNAUTHORIZED",
            LabError::NotFound(_) => "NOT_FOUND",
            LabError::Repository(RepositoryError::NotFound { .. }) => "NOT_FOUND",
            LabError::Repository(RepositoryError::Unavailable(_)) => "SERVICE_UNAVAILABLE",
            LabError::Repository(RepositoryError::Conflict(_)) => "CONFLICT",
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            LabError::NotFound(_) => true,
            LabError::Repository(err) => err.is_not_found(),
            LabError::Unauthorized(_) => false,
        }
    }

    /// Convert to JSON body for machine-readable output
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.to_string(),
            "error_code": self.error_code()
        })
    }
}

pub type LabResult<T> = Result<T, LabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propagated_not_found_keeps_code() {
        let err = LabError::from(RepositoryError::lab_not_found(3));
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "lab 3 not found");
    }

    #[test]
    fn json_body_carries_code() {
        let body = LabError::unauthorized("only professors can create a lab").to_json();
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "UNAUTHORIZED");
        assert_eq!(body["error"], "only professors can create a lab");
    }

    #[test]
    fn unavailable_maps_to_service_unavailable() {
        let err = LabError::from(RepositoryError::Unavailable("timeout".to_string()));
        assert_eq!(err.error_code(), "SERVICE_UNAVAILABLE");
        assert!(!err.is_not_found());
    }
}
