use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for uploaded post images
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostsConfig {
    /// Root of the static image tree; uploads go to its `posts/` subdirectory.
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            images_dir: default_images_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("public/images")
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}
