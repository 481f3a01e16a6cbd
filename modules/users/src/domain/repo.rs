use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Credentials, NewUser, User, UserPatch};

/// Repository trait for User persistence operations.
///
/// This trait abstracts persistence operations for users, allowing the domain service
/// to remain independent of the underlying storage implementation.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// All users, oldest first.
    async fn find(&self) -> Result<Vec<User>, DomainError>;

    /// Find a user by ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Apply `patch` to the user and return the post-update state.
    ///
    /// Returns `Ok(None)` when no user has this ID.
    async fn find_by_id_and_update(
        &self,
        id: Uuid,
        patch: UserPatch,
    ) -> Result<Option<User>, DomainError>;

    /// Insert a new user. Unique email or username violations map to
    /// `DomainError::DuplicateField`.
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError>;

    /// Find a user with the stored password hash by (lowercase) email.
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, DomainError>;

    /// Find a user with the stored password hash by ID.
    async fn find_credentials_by_id(&self, id: Uuid) -> Result<Option<Credentials>, DomainError>;

    /// Replace the stored password hash. Returns `false` if the user is gone.
    async fn update_password(&self, id: Uuid, password_hash: String) -> Result<bool, DomainError>;
}
