use blog_http::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("You are not logged in! Please log in to get access.")]
    Unauthenticated,

    #[error("Invalid token. Please log in again!")]
    InvalidToken(String),

    #[error("Your token has expired! Please log in again.")]
    TokenExpired,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated | AuthError::TokenExpired => {
                ApiError::unauthorized(e.to_string())
            }
            AuthError::InvalidToken(ref reason) => {
                tracing::debug!(reason = %reason, "rejected bearer token");
                ApiError::unauthorized(e.to_string())
            }
            AuthError::Internal(message) => {
                tracing::error!(error = %message, "auth failure");
                ApiError::internal()
            }
        }
    }
}

impl axum::response::IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        ApiError::from(self).into_response()
    }
}
