//! Art Market Library
//!
//! Catalog, cart and user-profile backend for the painting marketplace.
//! Re-exports modules for the binaries and integration tests.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod repository;
pub mod seed;
pub mod services;

pub use config::Config;
pub use domain::{DomainError, OperationContext};
pub use error::{AppError, AppResult, ErrorResponse};
