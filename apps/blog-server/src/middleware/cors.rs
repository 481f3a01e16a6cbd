use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

/// `None` for a `*` entry, otherwise every entry parsed.
fn parse_list<T>(field: &str, entries: &[String]) -> Result<Option<Vec<T>>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if entries.iter().any(|e| e == "*") {
        return Ok(None);
    }
    entries
        .iter()
        .map(|e| e.parse::<T>().with_context(|| format!("invalid cors.{field} entry '{e}'")))
        .collect::<Result<Vec<T>>>()
        .map(Some)
}

/// Build a CORS layer from config.
///
/// # Errors
/// Returns an error on an unparseable entry, or if `allow_credentials` is
/// combined with a `*` entry.
pub fn build_cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    let origins = parse_list::<HeaderValue>("allowed_origins", &cfg.allowed_origins)?;
    let methods = parse_list::<Method>("allowed_methods", &cfg.allowed_methods)?;
    let headers = parse_list::<HeaderName>("allowed_headers", &cfg.allowed_headers)?;

    ensure!(
        !cfg.allow_credentials || (origins.is_some() && methods.is_some() && headers.is_some()),
        "cors: '*' cannot be combined with allow_credentials=true"
    );

    let mut layer = CorsLayer::new()
        .allow_origin(origins.map_or_else(|| AllowOrigin::from(Any), AllowOrigin::list))
        .allow_methods(methods.map_or_else(|| AllowMethods::from(Any), AllowMethods::list))
        .allow_headers(headers.map_or_else(|| AllowHeaders::from(Any), AllowHeaders::list))
        .allow_credentials(cfg.allow_credentials);
    if cfg.max_age_seconds > 0 {
        layer = layer.max_age(Duration::from_secs(cfg.max_age_seconds));
    }
    Ok(layer)
}
