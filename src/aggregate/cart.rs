//! Cart Aggregate
//!
//! A user's cart: an ordered list of (product, quantity) lines plus two
//! derived totals. Totals are never set directly; they are recomputed from
//! the current lines and current catalog prices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, Price, Quantity};

/// A single cart line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: Quantity,
}

/// Derived cart totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub total_amount: Price,
    pub total_items: i64,
}

/// Cart Aggregate
///
/// One per user, created lazily. Line order is insertion order and is
/// preserved across quantity updates.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    /// Owning user
    user_id: Uuid,

    /// Lines in insertion order
    items: Vec<CartLine>,

    /// Totals as of the last recompute
    totals: CartTotals,

    /// Set by every line mutation, cleared by a recompute
    stale: bool,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Cart {
    /// Create an empty cart for a user
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            items: Vec::new(),
            totals: CartTotals::default(),
            stale: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a cart from persisted state
    pub fn from_db_state(
        user_id: Uuid,
        items: Vec<CartLine>,
        totals: CartTotals,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            items,
            totals,
            stale: false,
            created_at,
            updated_at,
        }
    }

    // =========================================================================
    // Line mutations
    // =========================================================================

    /// Add `quantity` of a product. Merges into an existing line, otherwise
    /// appends a new one. Returns the line's resulting quantity.
    pub fn add_item(&mut self, product_id: Uuid, quantity: Quantity) -> Quantity {
        let resulting = match self.line_mut(product_id) {
            Some(line) => {
                line.quantity = line.quantity.merge(quantity);
                line.quantity
            }
            None => {
                self.items.push(CartLine {
                    product_id,
                    quantity,
                });
                quantity
            }
        };
        self.touch();
        resulting
    }

    /// Replace the quantity of an existing line.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: Quantity) -> Result<(), DomainError> {
        let line = self
            .line_mut(product_id)
            .ok_or(DomainError::ItemNotFound(product_id))?;
        line.quantity = quantity;
        self.touch();
        Ok(())
    }

    /// Remove a product's line. Returns whether a line was removed; removing
    /// an absent product leaves the cart untouched.
    pub fn remove_item(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.product_id != product_id);
        let removed = self.items.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Empty the cart. Totals are zero immediately.
    pub fn clear(&mut self) {
        self.items.clear();
        self.totals = CartTotals::default();
        self.stale = false;
        self.updated_at = Utc::now();
    }

    /// Drop every line whose product is rejected by `keep`.
    /// Returns the removed product ids.
    pub fn retain_products<F>(&mut self, keep: F) -> Vec<Uuid>
    where
        F: Fn(Uuid) -> bool,
    {
        let (kept, dropped): (Vec<CartLine>, Vec<CartLine>) =
            self.items.iter().copied().partition(|line| keep(line.product_id));
        if dropped.is_empty() {
            return Vec::new();
        }
        self.items = kept;
        self.touch();
        dropped.into_iter().map(|line| line.product_id).collect()
    }

    // =========================================================================
    // Derived totals
    // =========================================================================

    /// Recompute totals from the current lines using `price_of` for each
    /// product's current price. An empty cart needs no price lookups.
    ///
    /// On failure the cart stays stale and the previous totals are kept.
    /// Totals that overflow fail with `DomainError::CartTotalOverflow`.
    pub fn recompute_totals<F>(&mut self, price_of: F) -> Result<CartTotals, DomainError>
    where
        F: Fn(Uuid) -> Option<Price>,
    {
        if self.items.is_empty() {
            self.totals = CartTotals::default();
            self.stale = false;
            return Ok(self.totals);
        }

        let mut total_amount = Price::zero();
        let mut total_items: i64 = 0;
        for line in &self.items {
            let price =
                price_of(line.product_id).ok_or(DomainError::ProductNotFound(line.product_id))?;
            total_amount = price
                .checked_times(line.quantity)
                .and_then(|line_total| total_amount.checked_add(line_total))
                .ok_or(DomainError::CartTotalOverflow)?;
            total_items = total_items
                .checked_add(i64::from(line.quantity.value()))
                .ok_or(DomainError::CartTotalOverflow)?;
        }

        self.totals = CartTotals {
            total_amount,
            total_items,
        };
        self.stale = false;
        Ok(self.totals)
    }

    /// Totals, or `None` while a mutation has not been followed by a recompute
    pub fn totals(&self) -> Option<CartTotals> {
        (!self.stale).then_some(self.totals)
    }

    /// Whether the stored totals reflect the current lines
    pub fn is_consistent(&self) -> bool {
        !self.stale
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: Uuid) -> Option<Quantity> {
        self.items
            .iter()
            .find(|line| line.product_id == product_id)
            .map(|line| line.quantity)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn line_mut(&mut self, product_id: Uuid) -> Option<&mut CartLine> {
        self.items.iter_mut().find(|line| line.product_id == product_id)
    }

    fn touch(&mut self) {
        self.stale = true;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn qty(n: i64) -> Quantity {
        Quantity::new(n).unwrap()
    }

    fn prices(pairs: &[(Uuid, Price)]) -> impl Fn(Uuid) -> Option<Price> {
        let map: HashMap<Uuid, Price> = pairs.iter().copied().collect();
        move |id| map.get(&id).copied()
    }

    #[test]
    fn test_new_cart_is_empty_and_consistent() {
        let cart = Cart::new(Uuid::new_v4());
        assert!(cart.is_empty());
        assert_eq!(cart.totals(), Some(CartTotals::default()));
    }

    #[test]
    fn test_add_then_recompute() {
        let p1 = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());

        let resulting = cart.add_item(p1, qty(2));
        assert_eq!(resulting, qty(2));
        assert!(cart.totals().is_none(), "totals must be stale after a mutation");

        let totals = cart
            .recompute_totals(prices(&[(p1, Price::from_units(100))]))
            .unwrap();
        assert_eq!(totals.total_amount, Price::from_units(200));
        assert_eq!(totals.total_items, 2);
        assert_eq!(cart.totals(), Some(totals));
    }

    #[test]
    fn test_repeated_adds_merge() {
        let p1 = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());

        for n in [2, 3, 1, 4] {
            cart.add_item(p1, qty(n));
        }

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.quantity_of(p1), Some(qty(10)));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (p1, p2, p3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(1));
        cart.add_item(p2, qty(1));
        cart.add_item(p3, qty(1));
        cart.set_quantity(p1, qty(9)).unwrap();
        cart.add_item(p2, qty(1));

        let order: Vec<Uuid> = cart.items().iter().map(|l| l.product_id).collect();
        assert_eq!(order, vec![p1, p2, p3]);
    }

    #[test]
    fn test_set_quantity_replaces() {
        let p1 = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(5));
        cart.set_quantity(p1, qty(1)).unwrap();

        let totals = cart
            .recompute_totals(prices(&[(p1, Price::from_units(100))]))
            .unwrap();
        assert_eq!(cart.quantity_of(p1), Some(qty(1)));
        assert_eq!(totals.total_amount, Price::from_units(100));
        assert_eq!(totals.total_items, 1);
    }

    #[test]
    fn test_set_quantity_missing_item() {
        let mut cart = Cart::new(Uuid::new_v4());
        let missing = Uuid::new_v4();
        assert_eq!(
            cart.set_quantity(missing, qty(2)),
            Err(DomainError::ItemNotFound(missing))
        );
        assert!(cart.is_consistent());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let p1 = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(2));
        cart.recompute_totals(prices(&[(p1, Price::from_units(10))]))
            .unwrap();
        let before = cart.items().to_vec();

        assert!(!cart.remove_item(Uuid::new_v4()));
        assert_eq!(cart.items(), before.as_slice());
        assert!(cart.is_consistent());
    }

    #[test]
    fn test_remove_present() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(2));
        cart.add_item(p2, qty(1));

        assert!(cart.remove_item(p1));
        let totals = cart
            .recompute_totals(prices(&[(p2, Price::new(dec!(19.99)).unwrap())]))
            .unwrap();
        assert_eq!(totals.total_amount.value(), dec!(19.99));
        assert_eq!(totals.total_items, 1);
    }

    #[test]
    fn test_clear_zeroes_without_prices() {
        let p1 = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(3));
        cart.recompute_totals(prices(&[(p1, Price::from_units(50))]))
            .unwrap();

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.totals(), Some(CartTotals::default()));
    }

    #[test]
    fn test_empty_recompute_skips_lookup() {
        let mut cart = Cart::new(Uuid::new_v4());
        let totals = cart
            .recompute_totals(|_| panic!("no lookup expected for an empty cart"))
            .unwrap();
        assert_eq!(totals, CartTotals::default());
    }

    #[test]
    fn test_recompute_uses_current_price() {
        let p1 = Uuid::new_v4();
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(2));
        cart.recompute_totals(prices(&[(p1, Price::from_units(100))]))
            .unwrap();

        // Catalog price changed after the item was added
        let totals = cart
            .recompute_totals(prices(&[(p1, Price::from_units(80))]))
            .unwrap();
        assert_eq!(totals.total_amount, Price::from_units(160));
    }

    #[test]
    fn test_recompute_unresolved_product_fails() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(1));
        cart.add_item(p2, qty(1));

        let result = cart.recompute_totals(prices(&[(p1, Price::from_units(5))]));
        assert_eq!(result, Err(DomainError::ProductNotFound(p2)));
        assert!(!cart.is_consistent());
    }

    #[test]
    fn test_recompute_overflow_is_an_error() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(1));
        cart.recompute_totals(prices(&[(p1, Price::from_units(10))]))
            .unwrap();

        cart.add_item(p2, qty(1_000_000_000));
        let huge = Price::new(dec!(100000000000000000000)).unwrap();
        let result = cart.recompute_totals(prices(&[(p1, Price::from_units(10)), (p2, huge)]));

        assert_eq!(result, Err(DomainError::CartTotalOverflow));
        assert!(!cart.is_consistent());
        assert_eq!(cart.totals(), None);
    }

    #[test]
    fn test_retain_products_prunes() {
        let (p1, p2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut cart = Cart::new(Uuid::new_v4());
        cart.add_item(p1, qty(1));
        cart.add_item(p2, qty(4));

        let dropped = cart.retain_products(|id| id == p1);
        assert_eq!(dropped, vec![p2]);
        assert_eq!(cart.items().len(), 1);
        assert!(!cart.is_consistent());

        assert!(cart.retain_products(|_| true).is_empty());
    }
}
