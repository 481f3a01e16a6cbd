use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use blog_http::ApiError;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use http::{HeaderValue, header};

use crate::config::RateLimitConfig;

/// Only paths under this prefix are limited.
pub const LIMITED_PREFIX: &str = "/api";

pub const TOO_MANY_REQUESTS_MESSAGE: &str =
    "Too many request in this API, Please try again in one hour.";

type KeyedLimiter = RateLimiter<
    IpAddr,
    DefaultKeyedStateStore<IpAddr>,
    DefaultClock,
    StateInformationMiddleware,
>;

/// Per-client-IP limiter: `max_requests` per `window`, replenished evenly.
#[derive(Clone)]
pub struct IpRateLimiter {
    limiter: Arc<KeyedLimiter>,
    limit: HeaderValue,
}

impl IpRateLimiter {
    /// # Errors
    /// Returns an error if `max_requests` is zero or the window is too short
    /// to spread `max_requests` over it.
    pub fn from_config(cfg: &RateLimitConfig) -> Result<Self> {
        let burst = NonZeroU32::new(cfg.max_requests).context("rate_limit.max_requests is zero")?;
        let period = cfg
            .window
            .checked_div(cfg.max_requests)
            .context("rate_limit.max_requests is zero")?;
        let quota = Quota::with_period(period)
            .context("rate_limit.window is too short for max_requests")?
            .allow_burst(burst);

        Ok(Self {
            limiter: Arc::new(RateLimiter::keyed(quota).with_middleware::<StateInformationMiddleware>()),
            limit: burst.get().into(),
        })
    }

    /// Drop state for clients whose budget has fully replenished.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }
}

fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| {
            addr.ip()
        })
}

pub async fn rate_limit_middleware(
    State(limiter): State<IpRateLimiter>,
    req: Request,
    next: Next,
) -> Response {
    if !req.uri().path().starts_with(LIMITED_PREFIX) {
        return next.run(req).await;
    }

    let ip = client_ip(&req);
    match limiter.limiter.check_key(&ip) {
        Ok(state) => {
            let mut resp = next.run(req).await;
            let headers = resp.headers_mut();
            headers.insert("x-ratelimit-limit", limiter.limit.clone());
            headers.insert(
                "x-ratelimit-remaining",
                state.remaining_burst_capacity().into(),
            );
            resp
        }
        Err(not_until) => {
            let wait = not_until.wait_time_from(limiter.limiter.clock().now());
            tracing::warn!(client.ip = %ip, retry_after_s = wait.as_secs(), "rate limit exceeded");
            let mut resp = ApiError::too_many_requests(TOO_MANY_REQUESTS_MESSAGE).into_response();
            resp.headers_mut()
                .insert(header::RETRY_AFTER, wait.as_secs().max(1).into());
            resp
        }
    }
}
