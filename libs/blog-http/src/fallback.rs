use axum::extract::OriginalUri;

use crate::error::ApiError;

/// Catch-all for routes no module claimed.
#[allow(clippy::unused_async)]
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::not_found(format!("Cannot find this {uri} url in the server!"))
}
