use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use blog_http::with_request_id;
use http::HeaderName;
use tower_http::request_id::RequestId;

pub use tower_http::request_id::MakeRequestUuid as MakeReqId;

/// Header carrying the request id in both directions.
#[must_use]
pub fn header() -> HeaderName {
    HeaderName::from_static("x-request-id")
}

/// Record the request id into the current span, expose it as a plain `String`
/// extension and scope it for error bodies rendered further in.
pub async fn push_req_id_to_extensions(mut req: Request, next: Next) -> Response {
    let rid = req
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .map(str::to_owned);

    match rid {
        Some(rid) => {
            tracing::Span::current().record("request_id", rid.as_str());
            req.extensions_mut().insert(rid.clone());
            with_request_id(rid, next.run(req)).await
        }
        None => next.run(req).await,
    }
}
