use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::model::{PasswordChange, Signup, User};

/// REST DTO for user representation. The password hash never leaves storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// `data` payload of the list endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct UsersData {
    pub users: Vec<UserDto>,
}

/// `data` payload carrying a single, possibly missing, user.
#[derive(Debug, Clone, Serialize)]
pub struct UserData {
    pub user: Option<UserDto>,
}

/// `data` payload of the profile-update endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedUserData {
    pub updated_user: Option<UserDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupReq {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl From<SignupReq> for Signup {
    fn from(req: SignupReq) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            password_confirm: req.password_confirm,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginReq {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordReq {
    pub password_current: String,
    pub password: String,
    pub password_confirm: String,
}

impl From<UpdatePasswordReq> for PasswordChange {
    fn from(req: UpdatePasswordReq) -> Self {
        Self {
            current: req.password_current,
            password: req.password,
            password_confirm: req.password_confirm,
        }
    }
}
