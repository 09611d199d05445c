//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;
use uuid::Uuid;

/// Domain-specific errors
///
/// These errors represent business rule violations for the cart, catalog
/// and profile. Their messages are shown to the caller as-is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Referenced product does not resolve in the catalog
    #[error("Product not found")]
    ProductNotFound(Uuid),

    /// Product exists but cannot be added to a cart
    #[error("Product is out of stock")]
    ProductOutOfStock(Uuid),

    /// The user has no cart yet
    #[error("Cart not found")]
    CartNotFound,

    /// Product is not a line in the cart
    #[error("Item not found in cart")]
    ItemNotFound(Uuid),

    /// Quantity below 1
    #[error("Quantity must be at least 1")]
    InvalidQuantity(i64),

    /// Line totals exceed what a price can represent
    #[error("Cart total is too large")]
    CartTotalOverflow,

    /// Another user already holds the requested email
    #[error("Email is already in use")]
    EmailAlreadyInUse,

    /// User profile does not exist
    #[error("User not found")]
    UserNotFound(Uuid),

    /// Product data failed catalog validation
    #[error("{0}")]
    InvalidProduct(String),

    /// Profile field failed validation
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    /// Check if this is a lookup failure (maps to 404)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ProductNotFound(_)
                | Self::CartNotFound
                | Self::ItemNotFound(_)
                | Self::UserNotFound(_)
        )
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProductNotFound(_) => "product_not_found",
            Self::ProductOutOfStock(_) => "product_out_of_stock",
            Self::CartNotFound => "cart_not_found",
            Self::ItemNotFound(_) => "item_not_found",
            Self::InvalidQuantity(_) => "invalid_quantity",
            Self::CartTotalOverflow => "cart_total_overflow",
            Self::EmailAlreadyInUse => "email_in_use",
            Self::UserNotFound(_) => "user_not_found",
            Self::InvalidProduct(_) => "invalid_product",
            Self::Validation(_) => "validation_error",
        }
    }
}
