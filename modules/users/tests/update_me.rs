//! Profile-update path against a repository double: proves what reaches storage.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum::{Extension, Router};
use serde_json::json;
use uuid::Uuid;

mod support;
use support::{CountingRepo, json_request, jwt_keys, send};
use users::{Service, ServiceConfig, UserPatch};

fn app(repo: Arc<CountingRepo>) -> (Router, String) {
    let keys = jwt_keys();
    let auth = format!("Bearer {}", keys.issue(Uuid::new_v4()).unwrap());
    let service = Arc::new(Service::new(repo, ServiceConfig::default()));
    let router = users::register_routes(Router::new(), service).layer(Extension(keys));
    (router, auth)
}

#[tokio::test]
async fn password_payloads_never_reach_storage() {
    for body in [
        json!({"password": "x"}),
        json!({"password": ""}),
        json!({"password": null, "username": "al"}),
        json!({"passwordConfirm": "x"}),
    ] {
        let repo = Arc::new(CountingRepo::default());
        let (router, auth) = app(repo.clone());

        let (status, resp) = send(
            router,
            json_request("PATCH", "/api/v1/users/updateMe", Some(&auth), &body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {body}");
        assert_eq!(resp["status"], "fail");
        assert_eq!(repo.calls(), 0, "payload {body}");
    }
}

#[tokio::test]
async fn only_username_and_email_are_forwarded() {
    let repo = Arc::new(CountingRepo::default());
    let (router, auth) = app(repo.clone());

    let (status, resp) = send(
        router,
        json_request(
            "PATCH",
            "/api/v1/users/updateMe",
            Some(&auth),
            &json!({"username": "al", "role": "admin", "active": false}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["status"], "success");
    assert!(resp["data"]["updatedUser"].is_object());
    assert_eq!(repo.calls(), 1);
    assert_eq!(
        repo.last_patch.lock().unwrap().clone(),
        Some(UserPatch {
            username: Some("al".to_owned()),
            email: None,
        })
    );
}

#[tokio::test]
async fn empty_payload_forwards_empty_patch() {
    let repo = Arc::new(CountingRepo::default());
    let (router, auth) = app(repo.clone());

    let (status, _) = send(
        router,
        json_request(
            "PATCH",
            "/api/v1/users/updateMe",
            Some(&auth),
            &json!({"photo": "me.png"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        repo.last_patch.lock().unwrap().clone(),
        Some(UserPatch::default())
    );
}

#[tokio::test]
async fn non_string_field_is_rejected_before_storage() {
    let repo = Arc::new(CountingRepo::default());
    let (router, auth) = app(repo.clone());

    let (status, resp) = send(
        router,
        json_request(
            "PATCH",
            "/api/v1/users/updateMe",
            Some(&auth),
            &json!({"username": 7}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["code"], "validation_failed");
    assert_eq!(repo.calls(), 0);
}
