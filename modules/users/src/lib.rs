//! Users Module
//!
//! User accounts for the blog API: listing and reading profiles, updating the
//! caller's own profile, signup, login and password changes.
//!
//! ## Layering
//!
//! - `domain` - business rules, the whitelist filter and the `UsersRepository` port
//! - `infra` - SeaORM entity, repository implementation and migrations
//! - `api::rest` - axum handlers, DTOs and the domain to HTTP error mapping
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod domain;
pub mod infra;

pub use api::rest::routes::register_routes;
pub use domain::error::DomainError;
pub use domain::model::{Credentials, NewUser, PasswordChange, Signup, User, UserPatch};
pub use domain::repo::UsersRepository;
pub use domain::service::{Service, ServiceConfig};
pub use infra::storage::migrations::Migrator;
pub use infra::storage::sea_orm_repo::SeaOrmUsersRepository;
