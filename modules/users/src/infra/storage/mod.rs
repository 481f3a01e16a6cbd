//! Infrastructure storage layer.
//!
//! All SeaORM-specific code lives here:
//! - `entity` - the `users` table definition
//! - `mapper` - conversions between SeaORM models and domain types
//! - `sea_orm_repo` - the `UsersRepository` implementation
//! - `migrations` - schema migrations applied at startup

pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod sea_orm_repo;
