//! Domain module
//!
//! Core domain types and business rules.

pub mod context;
pub mod error;
pub mod price;
pub mod product;
pub mod quantity;
pub mod user;

pub use context::OperationContext;
pub use error::DomainError;
pub use price::Price;
pub use product::{Category, NewProduct, Product};
pub use quantity::Quantity;
pub use user::{NewUser, ProfileChanges, Role, UserProfile};
