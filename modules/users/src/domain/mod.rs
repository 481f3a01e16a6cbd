pub mod error;
pub mod filter;
pub mod model;
pub mod password;
pub mod repo;
pub mod service;
