use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use http::StatusCode;

use crate::catalog;
use crate::error::ApiError;

/// `Json<T>` whose rejections are rendered through [`ApiError`].
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let def = match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => &catalog::PAYLOAD_TOO_LARGE,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => &catalog::UNSUPPORTED_MEDIA_TYPE,
            _ => &catalog::BAD_REQUEST,
        };
        ApiError::from_def(def, rejection.body_text())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::routing::post;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn echo(JsonBody(value): JsonBody<serde_json::Value>) -> Json<serde_json::Value> {
        Json(value)
    }

    fn app() -> Router {
        Router::new().route("/echo", post(echo))
    }

    #[tokio::test]
    async fn malformed_json_is_a_fail_envelope() {
        let req = Request::builder()
            .method("POST")
            .uri("/echo")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "fail");
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn missing_content_type_is_415() {
        let req = Request::builder()
            .method("POST")
            .uri("/echo")
            .body(Body::from("{}"))
            .unwrap();

        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
