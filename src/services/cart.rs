//! Cart Service
//!
//! Load, mutate, recompute and persist a user's cart. Every mutation is
//! applied to an in-memory `Cart`, its totals are recomputed against the
//! current catalog, and the result is written in one repository call.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::aggregate::{Cart, CartTotals};
use crate::domain::{DomainError, OperationContext, Product, Quantity};
use crate::error::AppResult;
use crate::repository::{CartRepository, ProductCatalog};

use super::{authorize, AddToCartCommand, CartItemView, CartView, UpdateQuantityCommand};

/// Cart operations for authenticated users
#[derive(Clone)]
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    catalog: Arc<dyn ProductCatalog>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartRepository>, catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { carts, catalog }
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Current cart with live prices, creating an empty cart on first access.
    ///
    /// Lines whose product no longer resolves are dropped from the result and
    /// pruned from the stored cart.
    pub async fn fetch(&self, user_id: Uuid) -> AppResult<CartView> {
        let (mut cart, created) = match self.carts.load(user_id).await? {
            Some(cart) => (cart, false),
            None => (Cart::new(user_id), true),
        };
        let stored_totals = cart.totals();
        let stored_lines = cart.items().len();

        let products = self.resolve_lines(&cart).await?;
        let totals = self.reconcile(&mut cart, &products)?;

        if created || cart.items().len() != stored_lines || stored_totals != Some(totals) {
            self.carts.upsert(&cart).await?;
        }

        let items = cart
            .items()
            .iter()
            .filter_map(|line| {
                products
                    .get(&line.product_id)
                    .map(|product| CartItemView::new(product, line.quantity))
            })
            .collect();

        Ok(CartView { items, totals })
    }

    // =========================================================================
    // Add
    // =========================================================================

    /// Add a product, merging with an existing line. Returns the line as it
    /// now stands.
    pub async fn add_item(
        &self,
        command: AddToCartCommand,
        context: &OperationContext,
    ) -> AppResult<CartItemView> {
        authorize(context, command.user_id)?;
        let quantity = Quantity::new(command.quantity)?;

        let product = self
            .catalog
            .resolve(command.product_id)
            .await?
            .ok_or(DomainError::ProductNotFound(command.product_id))?;

        if !product.in_stock {
            return Err(DomainError::ProductOutOfStock(product.id).into());
        }

        let mut cart = self
            .carts
            .load(command.user_id)
            .await?
            .unwrap_or_else(|| Cart::new(command.user_id));

        let resulting = cart.add_item(product.id, quantity);
        let totals = self.commit(&mut cart).await?;

        tracing::info!(
            user_id = %command.user_id,
            product_id = %product.id,
            quantity = %resulting,
            total_items = totals.total_items,
            correlation_id = %context.correlation_id,
            "Item added to cart"
        );

        Ok(CartItemView::new(&product, resulting))
    }

    // =========================================================================
    // Update quantity
    // =========================================================================

    /// Replace the quantity of an existing line
    pub async fn update_quantity(
        &self,
        command: UpdateQuantityCommand,
        context: &OperationContext,
    ) -> AppResult<CartTotals> {
        authorize(context, command.user_id)?;
        let quantity = Quantity::new(command.quantity)?;

        let mut cart = self
            .carts
            .load(command.user_id)
            .await?
            .ok_or(DomainError::CartNotFound)?;

        cart.set_quantity(command.product_id, quantity)?;
        let totals = self.commit(&mut cart).await?;

        tracing::info!(
            user_id = %command.user_id,
            product_id = %command.product_id,
            quantity = %quantity,
            correlation_id = %context.correlation_id,
            "Cart quantity updated"
        );

        Ok(totals)
    }

    // =========================================================================
    // Remove
    // =========================================================================

    /// Remove a product's line. Removing a product that is not in the cart
    /// succeeds.
    pub async fn remove_item(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        context: &OperationContext,
    ) -> AppResult<CartTotals> {
        authorize(context, user_id)?;
        let mut cart = self
            .carts
            .load(user_id)
            .await?
            .ok_or(DomainError::CartNotFound)?;

        let removed = cart.remove_item(product_id);
        let totals = self.commit(&mut cart).await?;

        tracing::info!(
            user_id = %user_id,
            product_id = %product_id,
            removed,
            correlation_id = %context.correlation_id,
            "Cart item removed"
        );

        Ok(totals)
    }

    // =========================================================================
    // Clear
    // =========================================================================

    /// Empty the cart, creating it if the user has none
    pub async fn clear(&self, user_id: Uuid, context: &OperationContext) -> AppResult<CartTotals> {
        authorize(context, user_id)?;
        let mut cart = self
            .carts
            .load(user_id)
            .await?
            .unwrap_or_else(|| Cart::new(user_id));

        cart.clear();
        self.carts.upsert(&cart).await?;

        tracing::info!(
            user_id = %user_id,
            correlation_id = %context.correlation_id,
            "Cart cleared"
        );

        Ok(CartTotals::default())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn resolve_lines(&self, cart: &Cart) -> AppResult<HashMap<Uuid, Product>> {
        if cart.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<Uuid> = cart.items().iter().map(|line| line.product_id).collect();
        Ok(self.catalog.resolve_many(&ids).await?)
    }

    /// Drop lines whose product is gone, then recompute totals at current prices
    fn reconcile(
        &self,
        cart: &mut Cart,
        products: &HashMap<Uuid, Product>,
    ) -> AppResult<CartTotals> {
        let pruned = cart.retain_products(|id| products.contains_key(&id));
        if !pruned.is_empty() {
            tracing::warn!(
                user_id = %cart.user_id(),
                pruned = ?pruned,
                "Removed cart lines for products no longer in the catalog"
            );
        }

        Ok(cart.recompute_totals(|id| products.get(&id).map(|p| p.price))?)
    }

    /// Recompute totals and persist lines and totals together
    async fn commit(&self, cart: &mut Cart) -> AppResult<CartTotals> {
        let products = self.resolve_lines(cart).await?;
        let totals = self.reconcile(cart, &products)?;
        self.carts.upsert(cart).await?;
        Ok(totals)
    }
}
