//! Repository module
//!
//! Persistence ports used by the services, with a PostgreSQL adapter for
//! production and an in-memory adapter for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::aggregate::{Cart, RecentlyViewed};
use crate::domain::{Category, NewProduct, NewUser, Product, ProfileChanges, UserProfile};

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::RepositoryError;

/// Default number of products returned by a catalog search
pub const DEFAULT_SEARCH_LIMIT: i64 = 20;

/// Upper bound on a catalog search page
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Catalog search filter
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Full-text query over title, description and artist
    pub text: Option<String>,
    pub category: Option<Category>,
    pub featured: Option<bool>,
    pub limit: i64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            text: None,
            category: None,
            featured: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl ProductQuery {
    /// Limit clamped to `1..=MAX_SEARCH_LIMIT`
    pub fn effective_limit(&self) -> i64 {
        self.limit.clamp(1, MAX_SEARCH_LIMIT)
    }
}

/// Product catalog collaborator
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Look up a product by id
    async fn resolve(&self, id: Uuid) -> Result<Option<Product>, RepositoryError>;

    /// Look up several products; ids that do not resolve are absent from the map
    async fn resolve_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Product>, RepositoryError>;

    /// Whether the product exists and is flagged in stock
    async fn is_in_stock(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.resolve(id).await?.is_some_and(|p| p.in_stock))
    }

    /// Filtered / full-text search
    async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError>;

    /// Increment the view counter and return the product
    async fn record_view(&self, id: Uuid) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product, or update the one with the same title and artist
    async fn upsert(&self, product: NewProduct) -> Result<Product, RepositoryError>;
}

/// Cart persistence
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Load a user's cart, if one exists
    async fn load(&self, user_id: Uuid) -> Result<Option<Cart>, RepositoryError>;

    /// Store lines and totals together. Rejects carts with stale totals.
    async fn upsert(&self, cart: &Cart) -> Result<(), RepositoryError>;
}

/// User profile persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, RepositoryError>;

    async fn insert(&self, user: NewUser) -> Result<UserProfile, RepositoryError>;

    /// Apply whitelisted changes; `None` if the user does not exist
    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, RepositoryError>;

    async fn load_recently_viewed(&self, id: Uuid) -> Result<RecentlyViewed, RepositoryError>;

    async fn save_recently_viewed(
        &self,
        id: Uuid,
        list: &RecentlyViewed,
    ) -> Result<(), RepositoryError>;
}

/// Identity attached to a live session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub email: String,
}

/// Session token lookup. Issuing tokens happens elsewhere.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Resolve an unexpired session by the hex SHA-256 digest of its token
    async fn resolve(&self, token_hash: &str) -> Result<Option<SessionUser>, RepositoryError>;
}

/// Hex-encoded SHA-256 digest of a bearer token, as stored in `sessions`
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
