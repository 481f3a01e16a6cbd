//! Axum extractor for the authenticated caller.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use http::HeaderMap;
use http::request::Parts;
use uuid::Uuid;

use crate::errors::AuthError;
use crate::jwt::JwtKeys;

/// Identity of the caller, resolved from a valid bearer token.
///
/// Requires `Arc<JwtKeys>` to be installed as a request extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let keys = parts.extensions.get::<Arc<JwtKeys>>().ok_or_else(|| {
            AuthError::Internal("JwtKeys not found - auth extension not configured".to_owned())
        })?;

        let token = extract_bearer_token(&parts.headers).ok_or(AuthError::Unauthenticated)?;
        let claims = keys.validate(token)?;

        Ok(Self { id: claims.sub })
    }
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
