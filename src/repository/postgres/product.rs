//! Product catalog backed by the `products` table

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{Category, NewProduct, Price, Product};
use crate::repository::{ProductCatalog, ProductQuery, RepositoryError};

const PRODUCT_COLUMNS: &str = "id, title, description, price, artist, category, medium, \
     dimensions, year, images, tags, in_stock, featured, rating, num_reviews, views, \
     created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    title: String,
    description: String,
    price: Decimal,
    artist: String,
    category: String,
    medium: String,
    dimensions: String,
    year: i32,
    images: Vec<String>,
    tags: Vec<String>,
    in_stock: bool,
    featured: bool,
    rating: f64,
    num_reviews: i32,
    views: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price)
            .map_err(|e| RepositoryError::Corrupt(format!("product {} price: {e}", row.id)))?;
        let category: Category = row
            .category
            .parse()
            .map_err(|e| RepositoryError::Corrupt(format!("product {}: {e}", row.id)))?;

        Ok(Product {
            id: row.id,
            title: row.title,
            description: row.description,
            price,
            artist: row.artist,
            category,
            medium: row.medium,
            dimensions: row.dimensions,
            year: row.year,
            images: row.images,
            tags: row.tags,
            in_stock: row.in_stock,
            featured: row.featured,
            rating: row.rating,
            num_reviews: row.num_reviews,
            views: row.views,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PgProductCatalog {
    pool: PgPool,
}

impl PgProductCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
    async fn resolve(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Product::try_from).transpose()
    }

    async fn resolve_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Product::try_from(row).map(|p| (p.id, p)))
            .collect()
    }

    async fn is_in_stock(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let in_stock: Option<bool> =
            sqlx::query_scalar("SELECT in_stock FROM products WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(in_stock.unwrap_or(false))
    }

    async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE TRUE"));

        let text = query
            .text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        if let Some(text) = &text {
            builder
                .push(" AND search_vector @@ plainto_tsquery('english', ")
                .push_bind(text.clone())
                .push(")");
        }
        if let Some(category) = query.category {
            builder.push(" AND category = ").push_bind(category.as_str());
        }
        if let Some(featured) = query.featured {
            builder.push(" AND featured = ").push_bind(featured);
        }

        match &text {
            Some(text) => {
                builder
                    .push(" ORDER BY ts_rank(search_vector, plainto_tsquery('english', ")
                    .push_bind(text.clone())
                    .push(")) DESC, created_at DESC");
            }
            None => {
                builder.push(" ORDER BY featured DESC, created_at DESC");
            }
        }
        builder.push(" LIMIT ").push_bind(query.effective_limit());

        let rows: Vec<ProductRow> = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET views = views + 1 WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn upsert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let product = product.normalized().map_err(RepositoryError::Invalid)?;
        let medium = product.medium().to_string();

        let row: ProductRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO products (
                id, title, description, price, artist, category, medium, dimensions,
                year, images, tags, in_stock, featured, rating, num_reviews
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (title, artist) DO UPDATE
            SET description = EXCLUDED.description,
                price = EXCLUDED.price,
                category = EXCLUDED.category,
                medium = EXCLUDED.medium,
                dimensions = EXCLUDED.dimensions,
                year = EXCLUDED.year,
                images = EXCLUDED.images,
                tags = EXCLUDED.tags,
                in_stock = EXCLUDED.in_stock,
                featured = EXCLUDED.featured,
                rating = EXCLUDED.rating,
                num_reviews = EXCLUDED.num_reviews,
                updated_at = NOW()
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(product.title)
        .bind(product.description)
        .bind(product.price.value())
        .bind(product.artist)
        .bind(product.category.as_str())
        .bind(medium)
        .bind(product.dimensions)
        .bind(product.year)
        .bind(product.images)
        .bind(product.tags)
        .bind(product.in_stock)
        .bind(product.featured)
        .bind(product.rating)
        .bind(product.num_reviews)
        .fetch_one(&self.pool)
        .await?;

        Product::try_from(row)
    }
}
