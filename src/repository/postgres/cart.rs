//! Cart persistence
//!
//! One `carts` row per user holding the derived totals, plus ordered
//! `cart_items` lines. Both are written in a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::aggregate::{Cart, CartLine, CartTotals};
use crate::domain::{Price, Quantity};
use crate::repository::{CartRepository, RepositoryError};

#[derive(Debug, Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn load(&self, user_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
        let header: Option<(Decimal, i64, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT total_amount, total_items, created_at, updated_at
            FROM carts
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some((total_amount, total_items, created_at, updated_at)) = header else {
            return Ok(None);
        };

        let rows: Vec<(Uuid, i32)> = sqlx::query_as(
            r#"
            SELECT product_id, quantity
            FROM cart_items
            WHERE user_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(|(product_id, quantity)| {
                let quantity = Quantity::new(i64::from(quantity)).map_err(|e| {
                    RepositoryError::Corrupt(format!("cart line {product_id}: {e}"))
                })?;
                Ok(CartLine {
                    product_id,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()?;

        let total_amount = Price::new(total_amount)
            .map_err(|e| RepositoryError::Corrupt(format!("cart {user_id} total: {e}")))?;

        Ok(Some(Cart::from_db_state(
            user_id,
            items,
            CartTotals {
                total_amount,
                total_items,
            },
            created_at,
            updated_at,
        )))
    }

    async fn upsert(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let totals = cart
            .totals()
            .ok_or(RepositoryError::StaleCart(cart.user_id()))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO carts (user_id, total_amount, total_items, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
            SET total_amount = EXCLUDED.total_amount,
                total_items = EXCLUDED.total_items,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(cart.user_id())
        .bind(totals.total_amount.value())
        .bind(totals.total_items)
        .bind(cart.created_at())
        .bind(cart.updated_at())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(cart.user_id())
            .execute(&mut *tx)
            .await?;

        if !cart.is_empty() {
            let product_ids: Vec<Uuid> = cart.items().iter().map(|l| l.product_id).collect();
            let quantities: Vec<i32> = cart.items().iter().map(|l| l.quantity.value()).collect();

            sqlx::query(
                r#"
                INSERT INTO cart_items (user_id, position, product_id, quantity)
                SELECT $1, (t.ordinality - 1)::int4, t.product_id, t.quantity
                FROM UNNEST($2::uuid[], $3::int4[])
                    WITH ORDINALITY AS t(product_id, quantity, ordinality)
                "#,
            )
            .bind(cart.user_id())
            .bind(product_ids)
            .bind(quantities)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            user_id = %cart.user_id(),
            lines = cart.items().len(),
            total_amount = %totals.total_amount,
            total_items = totals.total_items,
            "Cart persisted"
        );

        Ok(())
    }
}
