#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `users` integration tests.
//!
//! Provides an in-memory database, a ready-to-drive router, request helpers
//! and a counting repository double.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::{Extension, Router};
use blog_auth::JwtKeys;
use http_body_util::BodyExt;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use users::{
    Credentials, DomainError, Migrator, NewUser, SeaOrmUsersRepository, Service, ServiceConfig,
    Signup, User, UserPatch, UsersRepository,
};

pub const TEST_PASSWORD: &str = "pass1234word";

/// Create a fresh in-memory `SQLite` database with migrations applied.
///
/// # Panics
/// Panics if the database connection or migrations fail.
pub async fn inmem_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn jwt_keys() -> Arc<JwtKeys> {
    Arc::new(JwtKeys::from_secret(
        b"users-integration-secret",
        Duration::from_secs(3600),
    ))
}

/// Router, service and keys over one in-memory database.
pub struct TestContext {
    pub db: DatabaseConnection,
    pub service: Arc<Service>,
    pub keys: Arc<JwtKeys>,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = inmem_db().await;
        let repo = Arc::new(SeaOrmUsersRepository::new(db.clone()));
        let service = Arc::new(Service::new(repo, ServiceConfig::default()));
        Self {
            db,
            service,
            keys: jwt_keys(),
        }
    }

    pub fn router(&self) -> Router {
        users::register_routes(Router::new(), self.service.clone())
            .layer(Extension(self.keys.clone()))
    }

    /// Register a user through the service.
    pub async fn seed_user(&self, username: &str, email: &str) -> User {
        self.service
            .signup(Signup {
                username: username.to_owned(),
                email: email.to_owned(),
                password: TEST_PASSWORD.to_owned(),
                password_confirm: TEST_PASSWORD.to_owned(),
            })
            .await
            .expect("Failed to seed user")
    }

    pub fn bearer(&self, user_id: Uuid) -> String {
        format!("Bearer {}", self.keys.issue(user_id).unwrap())
    }
}

/// Send a request and decode the JSON response body.
pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Repository double that records calls and returns a canned user.
#[derive(Default)]
pub struct CountingRepo {
    pub calls: AtomicUsize,
    pub last_patch: std::sync::Mutex<Option<UserPatch>>,
}

impl CountingRepo {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn canned(id: Uuid) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: "canned".to_owned(),
            email: "canned@example.com".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait::async_trait]
impl UsersRepository for CountingRepo {
    async fn find(&self) -> Result<Vec<User>, DomainError> {
        self.hit();
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DomainError> {
        self.hit();
        Ok(None)
    }

    async fn find_by_id_and_update(
        &self,
        id: Uuid,
        patch: UserPatch,
    ) -> Result<Option<User>, DomainError> {
        self.hit();
        *self.last_patch.lock().unwrap() = Some(patch);
        Ok(Some(Self::canned(id)))
    }

    async fn create(&self, _new_user: NewUser) -> Result<User, DomainError> {
        self.hit();
        Ok(Self::canned(Uuid::new_v4()))
    }

    async fn find_credentials_by_email(
        &self,
        _email: &str,
    ) -> Result<Option<Credentials>, DomainError> {
        self.hit();
        Ok(None)
    }

    async fn find_credentials_by_id(&self, _id: Uuid) -> Result<Option<Credentials>, DomainError> {
        self.hit();
        Ok(None)
    }

    async fn update_password(&self, _id: Uuid, _password_hash: String) -> Result<bool, DomainError> {
        self.hit();
        Ok(false)
    }
}
