use blog_http::{ApiError, catalog};

use crate::domain::error::DomainError;

/// Map domain errors onto the shared error catalog.
impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::InvalidId { .. } => ApiError::from_def(&catalog::INVALID_ID, e.to_string()),
            DomainError::Validation { .. } => ApiError::validation(e.to_string()),
            DomainError::DuplicateField { .. } => ApiError::conflict(e.to_string()),
            DomainError::PasswordUpdateNotAllowed => ApiError::bad_request(e.to_string()),
            DomainError::IncorrectCredentials
            | DomainError::IncorrectCurrentPassword
            | DomainError::UserNoLongerExists => ApiError::unauthorized(e.to_string()),
            DomainError::Database { .. } | DomainError::PasswordHash { .. } => {
                // Log the internal error details but don't expose them to the client
                tracing::error!(error = ?e, "users: internal failure");
                ApiError::internal()
            }
        }
    }
}
