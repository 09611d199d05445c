//! Command and result definitions
//!
//! Commands carry the caller's intent into a service; results are shaped
//! for display.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::CartTotals;
use crate::domain::{Category, Price, Product, ProfileChanges, Quantity};

// =========================================================================
// Cart commands
// =========================================================================

/// Command to add a product to a user's cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartCommand {
    pub user_id: Uuid,
    pub product_id: Uuid,
    /// Raw requested quantity; validated by the service
    pub quantity: i64,
}

impl AddToCartCommand {
    /// Add a single unit
    pub fn new(user_id: Uuid, product_id: Uuid) -> Self {
        Self {
            user_id,
            product_id,
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Command to replace the quantity of a cart line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantityCommand {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
}

impl UpdateQuantityCommand {
    pub fn new(user_id: Uuid, product_id: Uuid, quantity: i64) -> Self {
        Self {
            user_id,
            product_id,
            quantity,
        }
    }
}

// =========================================================================
// Profile commands
// =========================================================================

/// Command to update the whitelisted profile fields
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileCommand {
    pub user_id: Uuid,
    pub changes: ProfileChanges,
}

impl UpdateProfileCommand {
    pub fn new(user_id: Uuid, changes: ProfileChanges) -> Self {
        Self { user_id, changes }
    }
}

// =========================================================================
// Results
// =========================================================================

/// A cart line joined with its product, as displayed to the shopper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: Uuid,
    pub title: String,
    pub artist: String,
    pub price: Price,
    pub image: Option<String>,
    pub quantity: Quantity,
}

impl CartItemView {
    pub fn new(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.id,
            title: product.title.clone(),
            artist: product.artist.clone(),
            price: product.price,
            image: product.primary_image().map(str::to_string),
            quantity,
        }
    }
}

/// Full cart contents with totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    #[serde(flatten)]
    pub totals: CartTotals,
}

/// Product fields shown in the recently-viewed list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub price: Price,
    pub images: Vec<String>,
    pub category: Category,
}

impl From<Product> for ProductSummary {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            artist: product.artist,
            price: product.price,
            images: product.images,
            category: product.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_cart_defaults_to_one() {
        let cmd = AddToCartCommand::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(cmd.quantity, 1);

        let cmd = cmd.with_quantity(4);
        assert_eq!(cmd.quantity, 4);
    }

    #[test]
    fn test_cart_view_serializes_flat_totals() {
        let view = CartView {
            items: vec![],
            totals: CartTotals::default(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["totalItems"], 0);
        assert!(json.get("totalAmount").is_some());
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
