//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

use art_market::api::{self, AppState};
use art_market::domain::{NewUser, Product, Role};
use art_market::repository::memory::{
    MemoryCartRepository, MemoryProductCatalog, MemorySessionRepository, MemoryUserRepository,
};
use art_market::repository::{ProductCatalog, ProductQuery, SessionUser, UserRepository};
use art_market::seed;

pub const TEST_TOKEN: &str = "test_token_123";

/// Router over in-memory adapters, seeded with the sample catalog and one
/// signed-in shopper
pub struct TestApp {
    pub router: Router,
    pub catalog: MemoryProductCatalog,
    pub users: MemoryUserRepository,
    pub sessions: MemorySessionRepository,
    pub user_id: Uuid,
}

impl TestApp {
    /// Product by title from the seeded catalog
    pub async fn product(&self, title: &str) -> Product {
        self.catalog
            .search(&ProductQuery {
                limit: 100,
                ..Default::default()
            })
            .await
            .unwrap()
            .into_iter()
            .find(|p| p.title == title)
            .unwrap_or_else(|| panic!("seeded product {title} missing"))
    }

    /// Create another user with a live session token
    pub async fn sign_in(&self, email: &str, token: &str) -> Uuid {
        let user = self
            .users
            .insert(NewUser {
                first_name: "Other".to_string(),
                last_name: "Shopper".to_string(),
                email: email.to_string(),
                role: Role::User,
            })
            .await
            .unwrap();
        self.sessions.issue(
            token,
            SessionUser {
                user_id: user.id,
                email: user.email,
            },
        );
        user.id
    }

    /// Send a request and decode the JSON body (Null when empty or not JSON)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}

pub async fn setup_test_app() -> TestApp {
    let catalog = MemoryProductCatalog::new();
    let carts = MemoryCartRepository::new();
    let users = MemoryUserRepository::new();
    let sessions = MemorySessionRepository::new();

    seed::run(&catalog, &users).await.unwrap();

    let shopper = users
        .insert(NewUser {
            first_name: "Test".to_string(),
            last_name: "Shopper".to_string(),
            email: "shopper@example.com".to_string(),
            role: Role::User,
        })
        .await
        .unwrap();
    sessions.issue(
        TEST_TOKEN,
        SessionUser {
            user_id: shopper.id,
            email: shopper.email.clone(),
        },
    );

    let state = AppState::new(
        Arc::new(catalog.clone()),
        Arc::new(carts),
        Arc::new(users.clone()),
        Arc::new(sessions.clone()),
    );

    TestApp {
        router: api::build_router(state),
        catalog,
        users,
        sessions,
        user_id: shopper.id,
    }
}
