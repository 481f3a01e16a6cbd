//! Posts Module
//!
//! Image uploads for blog posts. Files land under `{images_dir}/posts/` and are
//! served back by the server's static file layer.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;

pub use api::rest::routes::register_routes;
pub use config::PostsConfig;
pub use domain::error::DomainError;
pub use domain::service::ImageStore;
