use std::sync::Arc;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use blog_auth::{CurrentUser, JwtKeys};
use blog_http::{ApiResult, Envelope, JsonBody};
use serde_json::{Map, Value};
use tracing::{field::Empty, info};

use crate::api::rest::dto::{
    LoginReq, SignupReq, UpdatePasswordReq, UpdatedUserData, UserData, UserDto, UsersData,
};
use crate::domain::service::{Service, parse_user_id};

/// List all users
#[tracing::instrument(name = "users.list_users", skip(svc), fields(request_id = Empty))]
pub async fn list_users(
    Extension(svc): Extension<Arc<Service>>,
) -> ApiResult<Json<Envelope<UsersData>>> {
    info!("Listing users");

    let users: Vec<UserDto> = svc
        .list_users()
        .await?
        .into_iter()
        .map(UserDto::from)
        .collect();
    let count = users.len();

    Ok(Json(Envelope::success(UsersData { users }).with_count(count)))
}

/// Get a specific user by ID. A missing user is reported as `user: null`.
#[tracing::instrument(
    name = "users.get_user",
    skip(svc),
    fields(user.id = %id, request_id = Empty)
)]
pub async fn get_user(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<UserData>>> {
    info!("Getting user");

    let id = parse_user_id(&id)?;
    let user = svc.get_user(id).await?.map(UserDto::from);
    Ok(Json(Envelope::success(UserData { user })))
}

/// Update the caller's own username and/or email
#[tracing::instrument(
    name = "users.update_me",
    skip(svc, body),
    fields(user.id = %current.id, request_id = Empty)
)]
pub async fn update_me(
    Extension(svc): Extension<Arc<Service>>,
    current: CurrentUser,
    JsonBody(body): JsonBody<Map<String, Value>>,
) -> ApiResult<Json<Envelope<UpdatedUserData>>> {
    info!("Updating own profile");

    let updated_user = svc
        .update_profile(current.id, &body)
        .await?
        .map(UserDto::from);
    Ok(Json(Envelope::success(UpdatedUserData { updated_user })))
}

/// Register a new account and return a session token
#[tracing::instrument(name = "users.signup", skip_all, fields(request_id = Empty))]
pub async fn signup(
    Extension(svc): Extension<Arc<Service>>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    JsonBody(req): JsonBody<SignupReq>,
) -> ApiResult<(StatusCode, Json<Envelope<UserData>>)> {
    let user = svc.signup(req.into()).await?;
    let token = keys.issue(user.id)?;

    info!(user.id = %user.id, "Signed up");
    Ok((
        StatusCode::CREATED,
        Json(
            Envelope::success(UserData {
                user: Some(user.into()),
            })
            .with_token(token),
        ),
    ))
}

/// Exchange email and password for a session token
#[tracing::instrument(name = "users.login", skip_all, fields(request_id = Empty))]
pub async fn login(
    Extension(svc): Extension<Arc<Service>>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    JsonBody(req): JsonBody<LoginReq>,
) -> ApiResult<Json<Envelope<UserData>>> {
    let user = svc.login(&req.email, &req.password).await?;
    let token = keys.issue(user.id)?;

    info!(user.id = %user.id, "Logged in");
    Ok(Json(
        Envelope::success(UserData {
            user: Some(user.into()),
        })
        .with_token(token),
    ))
}

/// Change the caller's password and return a fresh token
#[tracing::instrument(
    name = "users.update_my_password",
    skip_all,
    fields(user.id = %current.id, request_id = Empty)
)]
pub async fn update_my_password(
    Extension(svc): Extension<Arc<Service>>,
    Extension(keys): Extension<Arc<JwtKeys>>,
    current: CurrentUser,
    JsonBody(req): JsonBody<UpdatePasswordReq>,
) -> ApiResult<Json<Envelope<UserData>>> {
    let user = svc.update_password(current.id, req.into()).await?;
    let token = keys.issue(user.id)?;

    info!("Password changed");
    Ok(Json(
        Envelope::success(UserData {
            user: Some(user.into()),
        })
        .with_token(token),
    ))
}
