use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid {field}: {value}")]
    InvalidId { field: String, value: String },

    #[error("Invalid input data. {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate field value: {value}. Please use another value!")]
    DuplicateField { field: String, value: String },

    #[error("This route is not for password updates. Please use /updateMyPassword route")]
    PasswordUpdateNotAllowed,

    #[error("Incorrect email or password")]
    IncorrectCredentials,

    #[error("Your current password is wrong.")]
    IncorrectCurrentPassword,

    #[error("The user belonging to this token does no longer exist.")]
    UserNoLongerExists,

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Password hashing failed: {message}")]
    PasswordHash { message: String },
}

impl DomainError {
    pub fn invalid_id(value: impl Into<String>) -> Self {
        Self::InvalidId {
            field: "_id".to_owned(),
            value: value.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateField {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }
}
