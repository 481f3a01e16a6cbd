//! Blog API server: configuration, logging, middleware and the HTTP entry point.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod humantime_serde;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod signals;

pub use config::AppConfig;
pub use server::{build_router, connect_database, run};
