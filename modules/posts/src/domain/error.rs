use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Only Images can be uploaded!")]
    NotAnImage,

    #[error("Invalid file name: {reason}")]
    InvalidFileName { reason: &'static str },

    #[error("Please provide a file to upload")]
    MissingFile,

    #[error("Please provide a name for the uploaded file")]
    MissingName,

    #[error("Storage error: {message}")]
    Io { message: String },
}

impl DomainError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }
}
