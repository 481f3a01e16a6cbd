use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::ImageStore;

pub const UPLOAD_PATH: &str = "/api/v1/posts/upload";

/// Mount the upload route. Its body limit replaces the JSON limit used elsewhere.
pub fn register_routes(router: Router, store: Arc<ImageStore>, max_upload_bytes: usize) -> Router {
    router.route(
        UPLOAD_PATH,
        post(handlers::upload_image)
            .layer::<_, std::convert::Infallible>(DefaultBodyLimit::max(max_upload_bytes))
            .layer::<_, std::convert::Infallible>(Extension(store)),
    )
}
