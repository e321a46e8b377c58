//! Service-boundary error taxonomy

use thiserror::Error;

use crate::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Server error: {0}")]
    ServerError(String),
}

impl ServiceError {
    /// HTTP status a caller would answer with
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::NotFound(_) => 404,
            ServiceError::Conflict(_) | ServiceError::AlreadyExists(_) => 409,
            ServiceError::ServerError(_) => 500,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::BadRequest(m)
            | ServiceError::NotFound(m)
            | ServiceError::Conflict(m)
            | ServiceError::AlreadyExists(m)
            | ServiceError::ServerError(m) => m,
        }
    }

    pub(crate) fn not_found(what: &str, id: i32) -> Self {
        ServiceError::NotFound(format!("{} {} not found", what, id))
    }
}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ServiceError::NotFound("Resource not found".to_string()),
            DomainError::Validation(msg) => ServiceError::BadRequest(msg),
            DomainError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::ServerError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(ServiceError::NotFound("x".into()).status_code(), 404);
        assert_eq!(ServiceError::Conflict("x".into()).status_code(), 409);
        assert_eq!(ServiceError::AlreadyExists("x".into()).status_code(), 409);
        assert_eq!(ServiceError::ServerError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_domain_errors_are_reclassified() {
        assert!(matches!(
            ServiceError::from(DomainError::NotFound),
            ServiceError::NotFound(_)
        ));
        assert_eq!(
            ServiceError::from(DomainError::Validation("bad age".into())),
            ServiceError::BadRequest("bad age".into())
        );

        let err = ServiceError::from(DomainError::Database("disk I/O error".into()));
        assert_eq!(err.status_code(), 500);
        assert!(err.message().contains("disk I/O error"));
    }
}
