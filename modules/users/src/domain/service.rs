use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::filter::{PROFILE_FIELDS, filter_fields};
use crate::domain::model::{NewUser, PasswordChange, Signup, User, UserPatch};
use crate::domain::password::{hash_password, verify_password};
use crate::domain::repo::UsersRepository;

/// Keys that must never reach the profile-update path.
const PASSWORD_KEYS: &[&str] = &["password", "passwordConfirm"];

/// Domain service with business rules for user management.
/// Depends only on the repository port.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_username_length: usize,
    pub max_email_length: usize,
    pub min_password_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_username_length: 50,
            max_email_length: 255,
            min_password_length: 8,
        }
    }
}

/// Parse a path identifier into a user id.
///
/// # Errors
/// Returns `DomainError::InvalidId` when `raw` is not a UUID.
pub fn parse_user_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw).map_err(|_| DomainError::invalid_id(raw))
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repo: Arc<dyn UsersRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        debug!("Listing users");
        let users = self.repo.find().await?;
        debug!("Successfully listed {} users", users.len());
        Ok(users)
    }

    /// Missing users are not an error: the caller receives `None`.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        debug!("Getting user by id");
        self.repo.find_by_id(id).await
    }

    /// Update the caller's own profile from an arbitrary JSON body.
    ///
    /// Bodies carrying a password key are rejected before any storage access.
    /// Everything outside `username`/`email` is dropped silently.
    #[instrument(skip(self, body), fields(user_id = %user_id))]
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        body: &Map<String, Value>,
    ) -> Result<Option<User>, DomainError> {
        if PASSWORD_KEYS.iter().any(|key| body.contains_key(*key)) {
            return Err(DomainError::PasswordUpdateNotAllowed);
        }

        let filtered = filter_fields(body, PROFILE_FIELDS);
        let patch = self.validate_patch(&filtered)?;

        info!("Updating user profile");
        self.repo.find_by_id_and_update(user_id, patch).await
    }

    #[instrument(skip(self, signup), fields(username = %signup.username))]
    pub async fn signup(&self, signup: Signup) -> Result<User, DomainError> {
        info!("Registering new user");

        let username = self.validate_username(&signup.username)?;
        let email = self.validate_email(&signup.email)?;
        self.validate_new_password(&signup.password, &signup.password_confirm)?;

        let password_hash = hash_password(&signup.password)?;
        let user = self
            .repo
            .create(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(user_id = %user.id, "Successfully registered user");
        Ok(user)
    }

    /// Verify email and password. Unknown emails and wrong passwords are
    /// indistinguishable to the caller.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, DomainError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::validation(
                "email",
                "Please provide email and password!",
            ));
        }

        let email = email.trim().to_lowercase();
        let Some(creds) = self.repo.find_credentials_by_email(&email).await? else {
            debug!("Login attempt for unknown email");
            return Err(DomainError::IncorrectCredentials);
        };

        if !verify_password(password, &creds.password_hash)? {
            debug!(user_id = %creds.user.id, "Login attempt with wrong password");
            return Err(DomainError::IncorrectCredentials);
        }

        Ok(creds.user)
    }

    #[instrument(skip(self, change), fields(user_id = %user_id))]
    pub async fn update_password(
        &self,
        user_id: Uuid,
        change: PasswordChange,
    ) -> Result<User, DomainError> {
        let creds = self
            .repo
            .find_credentials_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNoLongerExists)?;

        if !verify_password(&change.current, &creds.password_hash)? {
            return Err(DomainError::IncorrectCurrentPassword);
        }
        self.validate_new_password(&change.password, &change.password_confirm)?;

        let password_hash = hash_password(&change.password)?;
        if !self.repo.update_password(user_id, password_hash).await? {
            return Err(DomainError::UserNoLongerExists);
        }

        info!("Password updated");
        Ok(creds.user)
    }

    /// Turn the filtered body into a typed patch, applying the field rules.
    fn validate_patch(&self, fields: &Map<String, Value>) -> Result<UserPatch, DomainError> {
        let mut patch = UserPatch::default();
        if let Some(value) = fields.get("username") {
            patch.username = Some(self.validate_username(expect_string("username", value)?)?);
        }
        if let Some(value) = fields.get("email") {
            patch.email = Some(self.validate_email(expect_string("email", value)?)?);
        }
        Ok(patch)
    }

    fn validate_username(&self, raw: &str) -> Result<String, DomainError> {
        let username = raw.trim();
        if username.is_empty() {
            return Err(DomainError::validation(
                "username",
                "A user must have a username",
            ));
        }
        let len = username.chars().count();
        if len > self.config.max_username_length {
            return Err(DomainError::validation(
                "username",
                format!(
                    "too long: {len} characters (max: {})",
                    self.config.max_username_length
                ),
            ));
        }
        Ok(username.to_owned())
    }

    fn validate_email(&self, raw: &str) -> Result<String, DomainError> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            return Err(DomainError::validation("email", "Please provide your email"));
        }
        if email.chars().count() > self.config.max_email_length {
            return Err(DomainError::validation(
                "email",
                format!(
                    "too long (max: {} characters)",
                    self.config.max_email_length
                ),
            ));
        }
        if !is_valid_email(&email) {
            return Err(DomainError::validation(
                "email",
                "Please provide a valid email",
            ));
        }
        Ok(email)
    }

    fn validate_new_password(&self, password: &str, confirm: &str) -> Result<(), DomainError> {
        if password.chars().count() < self.config.min_password_length {
            return Err(DomainError::validation(
                "password",
                format!(
                    "must be at least {} characters",
                    self.config.min_password_length
                ),
            ));
        }
        if password != confirm {
            return Err(DomainError::validation(
                "passwordConfirm",
                "Passwords are not the same!",
            ));
        }
        Ok(())
    }
}

fn expect_string<'a>(field: &str, value: &'a Value) -> Result<&'a str, DomainError> {
    value
        .as_str()
        .ok_or_else(|| DomainError::validation(field, "must be a string"))
}

/// `local@domain.tld`: non-empty local part, a dot after the `@`, no whitespace.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    struct NoRepo;

    #[async_trait::async_trait]
    impl UsersRepository for NoRepo {
        async fn find(&self) -> Result<Vec<User>, DomainError> {
            unreachable!()
        }
        async fn find_by_id(&self, _: Uuid) -> Result<Option<User>, DomainError> {
            unreachable!()
        }
        async fn find_by_id_and_update(
            &self,
            _: Uuid,
            _: UserPatch,
        ) -> Result<Option<User>, DomainError> {
            unreachable!()
        }
        async fn create(&self, _: NewUser) -> Result<User, DomainError> {
            unreachable!()
        }
        async fn find_credentials_by_email(
            &self,
            _: &str,
        ) -> Result<Option<crate::domain::model::Credentials>, DomainError> {
            unreachable!()
        }
        async fn find_credentials_by_id(
            &self,
            _: Uuid,
        ) -> Result<Option<crate::domain::model::Credentials>, DomainError> {
            unreachable!()
        }
        async fn update_password(&self, _: Uuid, _: String) -> Result<bool, DomainError> {
            unreachable!()
        }
    }

    fn service() -> Service {
        Service::new(Arc::new(NoRepo), ServiceConfig::default())
    }

    fn fields(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("al@example.com"));
        assert!(is_valid_email("a.b@sub.example.org"));
        assert!(!is_valid_email("al@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("al.example.com"));
        assert!(!is_valid_email("al@.com"));
        assert!(!is_valid_email("al @example.com"));
        assert!(!is_valid_email("al@ex@ample.com"));
    }

    #[test]
    fn patch_normalizes_values() {
        let patch = service()
            .validate_patch(&fields(json!({"username": "  al  ", "email": "Al@Example.COM"})))
            .unwrap();
        assert_eq!(patch.username.as_deref(), Some("al"));
        assert_eq!(patch.email.as_deref(), Some("al@example.com"));
    }

    #[test]
    fn non_string_values_are_rejected() {
        let svc = service();
        for body in [
            json!({"username": 42}),
            json!({"email": null}),
            json!({"username": ["al"]}),
        ] {
            let err = svc.validate_patch(&fields(body)).unwrap_err();
            assert!(matches!(err, DomainError::Validation { .. }));
        }
    }

    #[test]
    fn username_limits() {
        let svc = service();
        assert!(svc.validate_username("   ").is_err());
        assert!(svc.validate_username(&"x".repeat(50)).is_ok());
        assert!(svc.validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn email_length_limit() {
        let svc = service();
        let at_limit = format!("{}@example.com", "a".repeat(255 - "@example.com".len()));
        assert_eq!(at_limit.len(), 255);
        assert!(svc.validate_email(&at_limit).is_ok());

        let over = format!("a{at_limit}");
        let err = svc.validate_email(&over).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn new_password_rules() {
        let svc = service();
        assert!(svc.validate_new_password("short", "short").is_err());
        assert!(svc.validate_new_password("long-enough", "different").is_err());
        assert!(svc.validate_new_password("long-enough", "long-enough").is_ok());
    }

    #[tokio::test]
    async fn password_keys_short_circuit_before_storage() {
        let svc = service();
        for body in [
            json!({"password": "x"}),
            json!({"password": ""}),
            json!({"passwordConfirm": "x", "username": "al"}),
        ] {
            let err = svc
                .update_profile(Uuid::new_v4(), &fields(body))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::PasswordUpdateNotAllowed));
        }
    }

    #[test]
    fn parse_user_id_rejects_garbage() {
        assert!(parse_user_id("not-a-uuid").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
    }
}
