use crate::domain::model::{Credentials, User};
use crate::infra::storage::entity::Model as UserEntity;

/// Convert a database entity to a domain user (owned version)
impl From<UserEntity> for User {
    fn from(e: UserEntity) -> Self {
        Self {
            id: e.id,
            username: e.username,
            email: e.email,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<UserEntity> for Credentials {
    fn from(mut e: UserEntity) -> Self {
        let password_hash = std::mem::take(&mut e.password_hash);
        Self {
            user: e.into(),
            password_hash,
        }
    }
}
