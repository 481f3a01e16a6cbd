//! Shared HTTP building blocks for the blog API.
//!
//! This crate provides the pieces every module's REST layer relies on:
//! - the `{status: "success", ...}` response envelope (`Envelope`)
//! - the centralized error sink (`ApiError`) rendering `{status: "fail" | "error", ...}`
//! - a static error catalog (`ErrDef`)
//! - a JSON body extractor whose rejections flow through the error sink
//! - the catch-all handler for unknown routes
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod trace;

pub use catalog::ErrDef;
pub use envelope::{Envelope, STATUS_SUCCESS};
pub use error::{ApiError, ApiResult, ErrorBody};
pub use extract::JsonBody;
pub use fallback::route_not_found;
pub use trace::{current_request_id, with_request_id};
