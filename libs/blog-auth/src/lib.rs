//! Authentication for the blog API.
//!
//! Tokens are HS256 JWTs carried as `Authorization: Bearer <token>`. The
//! [`CurrentUser`] extractor turns a valid token into an explicit identity value
//! that handlers receive as a parameter.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod claims;
pub mod current_user;
pub mod errors;
pub mod jwt;

pub use claims::Claims;
pub use current_user::CurrentUser;
pub use errors::AuthError;
pub use jwt::JwtKeys;
