//! In-memory adapters
//!
//! Process-local implementations of the repository ports. Used by the test
//! suites and for running the API without a database.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::aggregate::{Cart, RecentlyViewed};
use crate::domain::{NewProduct, NewUser, Product, ProfileChanges, UserProfile};

use super::{
    hash_token, CartRepository, ProductCatalog, ProductQuery, RepositoryError, SessionRepository,
    SessionUser, UserRepository,
};

fn poisoned() -> RepositoryError {
    RepositoryError::Corrupt("in-memory store lock poisoned".to_string())
}

// =========================================================================
// Catalog
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryProductCatalog {
    products: Arc<RwLock<Vec<Product>>>,
}

impl MemoryProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a product, leaving any cart or view references dangling
    pub fn delete(&self, id: Uuid) -> bool {
        match self.products.write() {
            Ok(mut products) => {
                let before = products.len();
                products.retain(|p| p.id != id);
                products.len() != before
            }
            Err(_) => false,
        }
    }

    /// Mutate a stored product in place
    pub fn update<F>(&self, id: Uuid, f: F) -> bool
    where
        F: FnOnce(&mut Product),
    {
        match self.products.write() {
            Ok(mut products) => match products.iter_mut().find(|p| p.id == id) {
                Some(product) => {
                    f(product);
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ProductCatalog for MemoryProductCatalog {
    async fn resolve(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    async fn resolve_many(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, Product>, RepositoryError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        Ok(products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| (p.id, p.clone()))
            .collect())
    }

    async fn search(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().map_err(|_| poisoned())?;
        let terms: Vec<String> = query
            .text
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut found: Vec<Product> = products
            .iter()
            .filter(|p| query.category.map_or(true, |c| p.category == c))
            .filter(|p| query.featured.map_or(true, |f| p.featured == f))
            .filter(|p| {
                let haystack =
                    format!("{} {} {}", p.title, p.description, p.artist).to_lowercase();
                terms.iter().all(|t| haystack.contains(t.as_str()))
            })
            .cloned()
            .collect();

        found.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        found.truncate(usize::try_from(query.effective_limit()).unwrap_or(usize::MAX));
        Ok(found)
    }

    async fn record_view(&self, id: Uuid) -> Result<Option<Product>, RepositoryError> {
        let mut products = self.products.write().map_err(|_| poisoned())?;
        Ok(products.iter_mut().find(|p| p.id == id).map(|p| {
            p.views += 1;
            p.clone()
        }))
    }

    async fn upsert(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let product = product.normalized().map_err(RepositoryError::Invalid)?;
        let mut products = self.products.write().map_err(|_| poisoned())?;
        let now = Utc::now();
        let medium = product.medium().to_string();

        let existing = products
            .iter()
            .position(|p| p.title == product.title && p.artist == product.artist);
        let (id, created_at, views) = match existing {
            Some(idx) => (products[idx].id, products[idx].created_at, products[idx].views),
            None => (Uuid::new_v4(), now, 0),
        };

        let stored = Product {
            id,
            title: product.title,
            description: product.description,
            price: product.price,
            artist: product.artist,
            category: product.category,
            medium,
            dimensions: product.dimensions,
            year: product.year,
            images: product.images,
            tags: product.tags,
            in_stock: product.in_stock,
            featured: product.featured,
            rating: product.rating,
            num_reviews: product.num_reviews,
            views,
            created_at,
            updated_at: now,
        };

        match existing {
            Some(idx) => products[idx] = stored.clone(),
            None => products.push(stored.clone()),
        }
        Ok(stored)
    }
}

// =========================================================================
// Carts
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryCartRepository {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
}

impl MemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartRepository for MemoryCartRepository {
    async fn load(&self, user_id: Uuid) -> Result<Option<Cart>, RepositoryError> {
        let carts = self.carts.read().map_err(|_| poisoned())?;
        Ok(carts.get(&user_id).cloned())
    }

    async fn upsert(&self, cart: &Cart) -> Result<(), RepositoryError> {
        if !cart.is_consistent() {
            return Err(RepositoryError::StaleCart(cart.user_id()));
        }
        let mut carts = self.carts.write().map_err(|_| poisoned())?;
        carts.insert(cart.user_id(), cart.clone());
        Ok(())
    }
}

// =========================================================================
// Users
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, UserProfile>>>,
    recently_viewed: Arc<RwLock<HashMap<Uuid, RecentlyViewed>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find(&self, id: Uuid) -> Result<Option<UserProfile>, RepositoryError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, RepositoryError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserProfile, RepositoryError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(RepositoryError::UniqueViolation("users_email_key".to_string()));
        }

        let now = Utc::now();
        let profile = UserProfile {
            id: Uuid::new_v4(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(profile.id, profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<UserProfile>, RepositoryError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;
        if let Some(email) = &changes.email {
            let taken = users
                .values()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email));
            if taken {
                return Err(RepositoryError::UniqueViolation("users_email_key".to_string()));
            }
        }

        Ok(users.get_mut(&id).map(|profile| {
            changes.apply_to(profile);
            profile.clone()
        }))
    }

    async fn load_recently_viewed(&self, id: Uuid) -> Result<RecentlyViewed, RepositoryError> {
        let lists = self.recently_viewed.read().map_err(|_| poisoned())?;
        Ok(lists.get(&id).cloned().unwrap_or_default())
    }

    async fn save_recently_viewed(
        &self,
        id: Uuid,
        list: &RecentlyViewed,
    ) -> Result<(), RepositoryError> {
        let mut lists = self.recently_viewed.write().map_err(|_| poisoned())?;
        lists.insert(id, list.clone());
        Ok(())
    }
}

// =========================================================================
// Sessions
// =========================================================================

#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, SessionUser>>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bearer token for a user
    pub fn issue(&self, token: &str, user: SessionUser) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(hash_token(token), user);
        }
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn resolve(&self, token_hash: &str) -> Result<Option<SessionUser>, RepositoryError> {
        let sessions = self.sessions.read().map_err(|_| poisoned())?;
        Ok(sessions.get(token_hash).cloned())
    }
}
