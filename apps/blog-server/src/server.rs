//! HTTP server assembly: module routes, static files and the middleware stack.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::handler::HandlerWithoutStateExt;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{Extension, Router};
use blog_auth::JwtKeys;
use blog_http::route_not_found;
use posts::ImageStore;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::task::JoinHandle;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;
use users::{Migrator, SeaOrmUsersRepository, ServiceConfig};

use crate::config::{AppConfig, Environment};
use crate::middleware::rate_limit::{IpRateLimiter, rate_limit_middleware};
use crate::middleware::{cors, request_id, sanitize, security_headers};

/// Open the database pool and bring the schema up to date.
///
/// # Errors
/// Returns an error if the connection or a migration fails.
pub async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(config.database.dsn());
    opts.max_connections(config.database.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .context("failed to connect to database")?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;
    tracing::info!("database ready");
    Ok(db)
}

fn apply_trace_layer(router: Router) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &axum::http::Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(request_id::header())
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    method = %req.method(),
                    uri = %req.uri().path(),
                    version = ?req.version(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::info!(parent: span, "request completed");
                },
            ),
    )
}

/// Assemble the application router.
///
/// Runtime order, outermost first: `SetRequestId` → `PropagateRequestId` →
/// Trace (development only) → request id into extensions → security headers →
/// CORS → rate limit → JSON body limit → sanitize → routes.
///
/// # Errors
/// Returns an error if the CORS configuration is invalid.
pub fn build_router(
    config: &AppConfig,
    db: DatabaseConnection,
    keys: Arc<JwtKeys>,
    limiter: IpRateLimiter,
) -> Result<Router> {
    let repo = Arc::new(SeaOrmUsersRepository::new(db));
    let users_service = Arc::new(users::Service::new(repo, ServiceConfig::default()));
    let image_store = Arc::new(ImageStore::new(&config.uploads));

    let mut router = Router::new();
    router = users::register_routes(router, users_service);
    router = posts::register_routes(router, image_store, config.uploads.max_upload_bytes);
    // A known path with an unsupported method is reported like an unknown route.
    router = router.method_not_allowed_fallback(route_not_found);

    // Unclaimed paths are looked up under the images dir, then reported as 404.
    let static_files = ServeDir::new(&config.uploads.images_dir)
        .call_fallback_on_method_not_allowed(true)
        .fallback(route_not_found.into_service());
    router = router.fallback_service(static_files);

    router = router.layer(Extension(keys));

    let json_limit = config.http.json_body_limit_bytes;
    router = router.layer(from_fn_with_state(json_limit, sanitize::sanitize_middleware));
    router = router.layer(DefaultBodyLimit::max(json_limit));

    router = router.layer(from_fn_with_state(limiter, rate_limit_middleware));

    if let Some(cors_cfg) = &config.http.cors {
        router = router.layer(cors::build_cors_layer(cors_cfg)?);
    }

    router = security_headers::apply(router);

    router = router.layer(from_fn(request_id::push_req_id_to_extensions));

    if config.server.environment == Environment::Development {
        router = apply_trace_layer(router);
    }

    let x_request_id = request_id::header();
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router = router.layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId));

    Ok(router)
}

/// Periodically drop limiter state for clients that went quiet.
fn spawn_limiter_housekeeping(limiter: IpRateLimiter, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        tick.tick().await;
        loop {
            tick.tick().await;
            limiter.retain_recent();
        }
    })
}

/// Connect, migrate, bind and serve until a shutdown signal arrives.
///
/// # Errors
/// Returns an error if startup fails or the server stops abnormally.
pub async fn run(config: AppConfig) -> Result<()> {
    let keys = Arc::new(JwtKeys::from_secret(
        config.jwt_secret()?.as_bytes(),
        config.auth.jwt_expires_in,
    ));
    let db = connect_database(&config).await?;

    let limiter = IpRateLimiter::from_config(&config.http.rate_limit)?;
    let housekeeping = spawn_limiter_housekeeping(limiter.clone(), config.http.rate_limit.window);

    let router = build_router(&config, db, keys, limiter)?;

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(
        environment = ?config.server.environment,
        "HTTP server bound on {}",
        addr
    );

    let served = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(crate::signals::shutdown_signal())
    .await
    .context("HTTP server failed");

    housekeeping.abort();
    tracing::info!("HTTP server stopped");
    served
}
