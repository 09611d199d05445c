//! API integration tests over the in-memory adapters

use axum::http::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

use art_market::repository::ProductCatalog;

mod common;

use common::{setup_test_app, TEST_TOKEN};

fn amount(value: &Value) -> Decimal {
    value
        .as_str()
        .unwrap_or_else(|| panic!("expected decimal string, got {value}"))
        .parse()
        .unwrap()
}

// =========================================================================
// Public endpoints
// =========================================================================

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app().await;
    let (status, _) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_listing_filters() {
    let app = setup_test_app().await;

    let (status, json) = app.send("GET", "/api/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 8);

    let (_, json) = app
        .send("GET", "/api/products?category=landscape", None, None)
        .await;
    let products = json.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert!(products.iter().all(|p| p["category"] == "landscape"));

    let (_, json) = app
        .send("GET", "/api/products?featured=true&limit=2", None, None)
        .await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let (_, json) = app.send("GET", "/api/products?q=ocean", None, None).await;
    let products = json.as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["title"], "Ocean Waves");

    let (status, json) = app
        .send("GET", "/api/products?category=sculpture", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_product_detail_counts_views() {
    let app = setup_test_app().await;
    let product = app.product("Portrait of Grace").await;
    let uri = format!("/api/products/{}", product.id);

    app.send("GET", &uri, None, None).await;
    let (status, json) = app.send("GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["views"], 2);
    assert_eq!(json["medium"], "Oil on Canvas");

    let (status, json) = app
        .send("GET", &format!("/api/products/{}", Uuid::new_v4()), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Product not found");
}

// =========================================================================
// Authentication
// =========================================================================

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = setup_test_app().await;

    let (status, json) = app.send("GET", "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error_code"], "missing_token");

    let (status, json) = app
        .send("GET", "/api/user/profile", Some("not-a-session"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error_code"], "invalid_token");
    assert_eq!(json["success"], false);
}

// =========================================================================
// Cart
// =========================================================================

#[tokio::test]
async fn test_cart_flow() {
    let app = setup_test_app().await;
    let sunset = app.product("Sunset Over Mountains").await;
    let dreams = app.product("Abstract Dreams").await;
    let token = Some(TEST_TOKEN);

    // Add 2, then 3 more of the same painting
    let (status, json) = app
        .send(
            "POST",
            "/api/cart/add",
            token,
            Some(json!({ "productId": sunset.id, "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["quantity"], 2);
    assert_eq!(json["title"], "Sunset Over Mountains");

    let (_, json) = app
        .send(
            "POST",
            "/api/cart/add",
            token,
            Some(json!({ "productId": sunset.id, "quantity": 3 })),
        )
        .await;
    assert_eq!(json["quantity"], 5);

    let (_, json) = app.send("GET", "/api/cart/summary", token, None).await;
    assert_eq!(json["totalItems"], 5);
    assert_eq!(amount(&json["totalAmount"]), dec!(2250));
    assert_eq!(json["items"].as_array().unwrap().len(), 1);

    // Replace the quantity
    let (status, json) = app
        .send(
            "PUT",
            &format!("/api/cart/update/{}", sunset.id),
            token,
            Some(json!({ "quantity": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Cart updated successfully");

    // Quantity defaults to one
    app.send(
        "POST",
        "/api/cart/add",
        token,
        Some(json!({ "productId": dreams.id })),
    )
    .await;

    let (_, json) = app.send("GET", "/api/cart", token, None).await;
    let lines = json.as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["productId"], json!(sunset.id));
    assert_eq!(lines[1]["quantity"], 1);

    let (_, json) = app.send("GET", "/api/cart/summary", token, None).await;
    assert_eq!(json["totalItems"], 2);
    assert_eq!(amount(&json["totalAmount"]), dec!(770));

    // Remove twice: the second call is a no-op
    for _ in 0..2 {
        let (status, json) = app
            .send(
                "DELETE",
                &format!("/api/cart/remove/{}", sunset.id),
                token,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Item removed from cart");
    }

    let (_, json) = app.send("GET", "/api/cart/summary", token, None).await;
    assert_eq!(json["totalItems"], 1);
    assert_eq!(amount(&json["totalAmount"]), dec!(320));

    let (status, json) = app.send("DELETE", "/api/cart/clear", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Cart cleared successfully");

    let (_, json) = app.send("GET", "/api/cart/summary", token, None).await;
    assert_eq!(json["totalItems"], 0);
    assert_eq!(amount(&json["totalAmount"]), Decimal::ZERO);
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_errors() {
    let app = setup_test_app().await;
    let sunset = app.product("Sunset Over Mountains").await;
    let dreams = app.product("Abstract Dreams").await;
    let token = Some(TEST_TOKEN);

    // No cart yet
    let (status, json) = app
        .send(
            "PUT",
            &format!("/api/cart/update/{}", sunset.id),
            token,
            Some(json!({ "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Cart not found");

    let (status, json) = app
        .send(
            "POST",
            "/api/cart/add",
            token,
            Some(json!({ "productId": sunset.id, "quantity": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Quantity must be at least 1");

    let (status, json) = app
        .send(
            "POST",
            "/api/cart/add",
            token,
            Some(json!({ "productId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Product not found");

    app.send(
        "POST",
        "/api/cart/add",
        token,
        Some(json!({ "productId": sunset.id })),
    )
    .await;

    let (status, json) = app
        .send(
            "PUT",
            &format!("/api/cart/update/{}", dreams.id),
            token,
            Some(json!({ "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Item not found in cart");

    let (status, json) = app
        .send(
            "PUT",
            &format!("/api/cart/update/{}", sunset.id),
            token,
            Some(json!({ "quantity": -1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_quantity");

    // Out of stock leaves the cart as it was
    app.catalog.update(dreams.id, |p| p.in_stock = false);
    let (status, json) = app
        .send(
            "POST",
            "/api/cart/add",
            token,
            Some(json!({ "productId": dreams.id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Product is out of stock");

    let (_, json) = app.send("GET", "/api/cart/summary", token, None).await;
    assert_eq!(json["totalItems"], 1);
    assert_eq!(amount(&json["totalAmount"]), dec!(450));
}

#[tokio::test]
async fn test_cart_reflects_catalog_changes() {
    let app = setup_test_app().await;
    let sunset = app.product("Sunset Over Mountains").await;
    let waves = app.product("Ocean Waves").await;
    let token = Some(TEST_TOKEN);

    for product in [&sunset, &waves] {
        app.send(
            "POST",
            "/api/cart/add",
            token,
            Some(json!({ "productId": product.id })),
        )
        .await;
    }

    app.catalog.update(sunset.id, |p| {
        p.price = art_market::domain::Price::from_units(500);
    });
    app.catalog.delete(waves.id);

    let (status, json) = app.send("GET", "/api/cart/summary", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["totalItems"], 1);
    assert_eq!(amount(&json["totalAmount"]), dec!(500));
}

#[tokio::test]
async fn test_carts_are_per_user() {
    let app = setup_test_app().await;
    let sunset = app.product("Sunset Over Mountains").await;
    app.sign_in("other@example.com", "other-token").await;

    app.send(
        "POST",
        "/api/cart/add",
        Some(TEST_TOKEN),
        Some(json!({ "productId": sunset.id })),
    )
    .await;

    let (_, json) = app
        .send("GET", "/api/cart/summary", Some("other-token"), None)
        .await;
    assert_eq!(json["totalItems"], 0);

    // Still resolvable through the catalog port after the other user's reads
    assert!(app.catalog.resolve(sunset.id).await.unwrap().is_some());
}

// =========================================================================
// Profile
// =========================================================================

#[tokio::test]
async fn test_profile_read_and_update() {
    let app = setup_test_app().await;
    let token = Some(TEST_TOKEN);

    let (status, json) = app.send("GET", "/api/user/profile", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], "shopper@example.com");
    assert_eq!(json["data"]["id"], json!(app.user_id));

    let (status, json) = app
        .send(
            "PUT",
            "/api/user/profile",
            token,
            Some(json!({ "firstName": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "First name cannot be empty");

    let (status, json) = app
        .send(
            "PUT",
            "/api/user/profile",
            token,
            Some(json!({ "email": "admin@artmarket.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Email is already in use");

    let (status, json) = app
        .send(
            "PUT",
            "/api/user/profile",
            token,
            Some(json!({
                "lastName": "Collector",
                "city": "Porto",
                "zipCode": "4000-001",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Profile updated successfully");
    assert_eq!(json["data"]["lastName"], "Collector");
    assert_eq!(json["data"]["zipCode"], "4000-001");
    // Fields outside the whitelist are ignored
    assert_eq!(json["data"]["role"], "user");
}

#[tokio::test]
async fn test_recently_viewed_flow() {
    let app = setup_test_app().await;
    let sunset = app.product("Sunset Over Mountains").await;
    let dreams = app.product("Abstract Dreams").await;
    let token = Some(TEST_TOKEN);

    for product in [&sunset, &dreams, &sunset] {
        let (status, json) = app
            .send(
                "POST",
                "/api/user/recently-viewed",
                token,
                Some(json!({ "productId": product.id })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], json!(product.id));
    }

    let (_, json) = app
        .send("GET", "/api/user/recently-viewed", token, None)
        .await;
    let viewed = json.as_array().unwrap();
    assert_eq!(viewed.len(), 2);
    assert_eq!(viewed[0]["title"], "Sunset Over Mountains");
    assert_eq!(viewed[1]["artist"], "Marcus Chen");

    let (status, json) = app
        .send(
            "POST",
            "/api/user/recently-viewed",
            token,
            Some(json!({ "productId": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);

    let (status, json) = app
        .send("DELETE", "/api/user/recently-viewed", token, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Recently viewed cleared successfully");

    let (_, json) = app
        .send("GET", "/api/user/recently-viewed", token, None)
        .await;
    assert!(json.as_array().unwrap().is_empty());
}
