use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::{Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Base path of the users API.
pub const USERS_BASE_PATH: &str = "/api/v1/users";

/// Mount the users API under [`USERS_BASE_PATH`].
///
/// Handlers that issue or check tokens also expect `Arc<JwtKeys>` as a request
/// extension; the server installs it once for the whole router.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let users = Router::new()
        .route("/", get(handlers::list_users))
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/updateMe", patch(handlers::update_me))
        .route("/updateMyPassword", patch(handlers::update_my_password))
        .route("/{id}", get(handlers::get_user))
        .layer(Extension(service));

    router.nest(USERS_BASE_PATH, users)
}
