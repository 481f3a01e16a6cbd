use blog_http::ApiError;

use crate::domain::error::DomainError;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::NotAnImage
            | DomainError::InvalidFileName { .. }
            | DomainError::MissingFile
            | DomainError::MissingName => ApiError::bad_request(e.to_string()),
            DomainError::Io { .. } => {
                tracing::error!(error = ?e, "posts: storage failure");
                ApiError::internal()
            }
        }
    }
}
