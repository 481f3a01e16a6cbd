use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::config::PostsConfig;
use crate::domain::error::DomainError;

/// Subdirectory of the images root that holds post images.
pub const POSTS_SUBDIR: &str = "posts";

const MAX_FILE_NAME_LEN: usize = 255;

/// Writes uploaded post images to disk.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    #[must_use]
    pub fn new(config: &PostsConfig) -> Self {
        Self {
            dir: config.images_dir.join(POSTS_SUBDIR),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and store an image as `{images_dir}/posts/{name}`, replacing any
    /// existing file with that name.
    ///
    /// # Errors
    /// `NotAnImage` for non-`image/*` content, `InvalidFileName` for names that
    /// could escape the target directory, `Io` when the write fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(
        &self,
        name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<PathBuf, DomainError> {
        ensure_image(content_type)?;
        validate_file_name(name)?;

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            tracing::error!(error = %e, dir = %self.dir.display(), "cannot create upload dir");
            DomainError::io(e.to_string())
        })?;

        let path = self.dir.join(name);
        debug!(path = %path.display(), "writing upload");
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "cannot write upload");
            DomainError::io(e.to_string())
        })?;

        info!(path = %path.display(), "image stored");
        Ok(path)
    }
}

/// Accept only `image/*` media types.
///
/// # Errors
/// Returns `DomainError::NotAnImage` for missing, unparsable or non-image types.
pub fn ensure_image(content_type: Option<&str>) -> Result<(), DomainError> {
    let is_image = content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.type_() == mime::IMAGE);
    if is_image {
        Ok(())
    } else {
        Err(DomainError::NotAnImage)
    }
}

/// A file name must be a single plain path segment.
///
/// # Errors
/// Returns `DomainError::InvalidFileName` describing the first violation.
pub fn validate_file_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.len() > MAX_FILE_NAME_LEN {
        Some("name is too long")
    } else if name.contains(['/', '\\']) {
        Some("path separators are not allowed")
    } else if name.contains("..") {
        Some("'..' is not allowed")
    } else if name.chars().any(char::is_control) {
        Some("control characters are not allowed")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidFileName { reason }),
        None => Ok(()),
    }
}
