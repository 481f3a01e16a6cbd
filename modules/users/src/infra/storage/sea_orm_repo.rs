//! SeaORM-backed repository implementation for the domain port.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::model::{Credentials, NewUser, User, UserPatch};
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};

/// SeaORM repository over the `users` table.
pub struct SeaOrmUsersRepository {
    db: DatabaseConnection,
}

impl SeaOrmUsersRepository {
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::database(e.to_string())
}

/// Map a failed write, turning unique index violations into `DuplicateField`.
fn write_err(e: DbErr, username: Option<&str>, email: Option<&str>) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = e.sql_err() {
        debug!(detail = %detail, "unique constraint violated");
        return if detail.contains("email") {
            DomainError::duplicate_field("email", email.unwrap_or_default())
        } else {
            DomainError::duplicate_field("username", username.unwrap_or_default())
        };
    }
    db_err(e)
}

#[async_trait::async_trait]
impl UsersRepository for SeaOrmUsersRepository {
    #[instrument(
        name = "users.repo.find",
        skip(self),
        fields(db.operation = "SELECT")
    )]
    async fn find(&self) -> Result<Vec<User>, DomainError> {
        let rows = UserEntity::find()
            .order_by_asc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(
        name = "users.repo.find_by_id",
        skip(self),
        fields(db.operation = "SELECT", user.id = %id)
    )]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    #[instrument(
        name = "users.repo.find_by_id_and_update",
        skip(self, patch),
        fields(db.operation = "UPDATE", user.id = %id)
    )]
    async fn find_by_id_and_update(
        &self,
        id: Uuid,
        patch: UserPatch,
    ) -> Result<Option<User>, DomainError> {
        let Some(model) = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(model.into()));
        }

        let mut am: UserAM = model.into();
        if let Some(username) = &patch.username {
            am.username = Set(username.clone());
        }
        if let Some(email) = &patch.email {
            am.email = Set(email.clone());
        }
        am.updated_at = Set(Utc::now());

        match am.update(&self.db).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(write_err(
                e,
                patch.username.as_deref(),
                patch.email.as_deref(),
            )),
        }
    }

    #[instrument(
        name = "users.repo.create",
        skip(self, new_user),
        fields(db.operation = "INSERT")
    )]
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let now = Utc::now();
        let am = UserAM {
            id: Set(Uuid::now_v7()),
            username: Set(new_user.username.clone()),
            email: Set(new_user.email.clone()),
            password_hash: Set(new_user.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = am.insert(&self.db).await.map_err(|e| {
            write_err(e, Some(&new_user.username), Some(&new_user.email))
        })?;
        Ok(model.into())
    }

    #[instrument(
        name = "users.repo.find_credentials_by_email",
        skip(self, email),
        fields(db.operation = "SELECT")
    )]
    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, DomainError> {
        let found = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    #[instrument(
        name = "users.repo.find_credentials_by_id",
        skip(self),
        fields(db.operation = "SELECT", user.id = %id)
    )]
    async fn find_credentials_by_id(&self, id: Uuid) -> Result<Option<Credentials>, DomainError> {
        let found = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    #[instrument(
        name = "users.repo.update_password",
        skip(self, password_hash),
        fields(db.operation = "UPDATE", user.id = %id)
    )]
    async fn update_password(&self, id: Uuid, password_hash: String) -> Result<bool, DomainError> {
        let result = UserEntity::update_many()
            .col_expr(Column::PasswordHash, Expr::value(password_hash))
            .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
