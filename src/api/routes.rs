//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Extension, Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::domain::{
    Category, DomainError, OperationContext, Product, ProfileChanges, UserProfile,
};
use crate::error::AppError;
use crate::repository::{ProductCatalog, ProductQuery};
use crate::services::{
    AddToCartCommand, CartItemView, CartView, ProductSummary, UpdateProfileCommand,
    UpdateQuantityCommand,
};

use super::middleware::AuthenticatedUser;
use super::AppState;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default)]
    pub limit: Option<i64>,
}

impl ProductListQuery {
    fn into_query(self) -> Result<ProductQuery, AppError> {
        let category = match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => Some(
                c.parse::<Category>()
                    .map_err(|_| AppError::InvalidRequest(format!("Unknown category: {c}")))?,
            ),
            _ => None,
        };

        let mut query = ProductQuery {
            text: self.q,
            category,
            featured: self.featured,
            ..Default::default()
        };
        if let Some(limit) = self.limit {
            query.limit = limit;
        }
        Ok(query)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    #[serde(default)]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    #[serde(default)]
    pub last_name: Option<String>,
    #[validate(email(message = "Please enter a valid email"))]
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(request: UpdateProfileRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            address: request.address,
            city: request.city,
            state: request.state,
            zip_code: request.zip_code,
            country: request.country,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedRequest {
    pub product_id: Uuid,
}

/// `{success, message}` acknowledgement
#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

/// `{success, data}` envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            message: None,
        })
    }
}

/// First validation message, by field name order
fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    fields
        .into_iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}

// =========================================================================
// API Router
// =========================================================================

/// Catalog routes, no authentication
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:product_id", get(get_product))
}

/// Routes that act for the authenticated user
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Cart
        .route("/cart", get(get_cart))
        .route("/cart/summary", get(get_cart_summary))
        .route("/cart/add", post(add_to_cart))
        .route("/cart/update/:product_id", put(update_cart_item))
        .route("/cart/remove/:product_id", delete(remove_cart_item))
        .route("/cart/clear", delete(clear_cart))
        // Profile
        .route("/user/profile", get(get_profile).put(update_profile))
        .route(
            "/user/recently-viewed",
            post(add_recently_viewed)
                .get(get_recently_viewed)
                .delete(clear_recently_viewed),
        )
}

// =========================================================================
// Products
// =========================================================================

/// GET /products
async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    let query = params.into_query()?;
    let products = state.catalog.search(&query).await?;
    Ok(Json(products))
}

/// GET /products/:product_id, counting the view
async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .catalog
        .record_view(product_id)
        .await?
        .ok_or(DomainError::ProductNotFound(product_id))?;
    Ok(Json(product))
}

// =========================================================================
// Cart
// =========================================================================

/// GET /cart
async fn get_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<CartItemView>>, AppError> {
    let view = state.carts.fetch(user.user_id).await?;
    Ok(Json(view.items))
}

/// GET /cart/summary
async fn get_cart_summary(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<CartView>, AppError> {
    Ok(Json(state.carts.fetch(user.user_id).await?))
}

/// POST /cart/add
async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartItemView>, AppError> {
    let command =
        AddToCartCommand::new(user.user_id, request.product_id).with_quantity(request.quantity);
    Ok(Json(state.carts.add_item(command, &context).await?))
}

/// PUT /cart/update/:product_id
async fn update_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Path(product_id): Path<Uuid>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<AckResponse>, AppError> {
    let command = UpdateQuantityCommand::new(user.user_id, product_id, request.quantity);
    state.carts.update_quantity(command, &context).await?;
    Ok(AckResponse::ok("Cart updated successfully"))
}

/// DELETE /cart/remove/:product_id
async fn remove_cart_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Path(product_id): Path<Uuid>,
) -> Result<Json<AckResponse>, AppError> {
    state
        .carts
        .remove_item(user.user_id, product_id, &context)
        .await?;
    Ok(AckResponse::ok("Item removed from cart"))
}

/// DELETE /cart/clear
async fn clear_cart(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
) -> Result<Json<AckResponse>, AppError> {
    state.carts.clear(user.user_id, &context).await?;
    Ok(AckResponse::ok("Cart cleared successfully"))
}

// =========================================================================
// Profile
// =========================================================================

/// GET /user/profile
async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<DataResponse<UserProfile>>, AppError> {
    let profile = state.profiles.get_profile(user.user_id).await?;
    Ok(DataResponse::ok(profile))
}

/// PUT /user/profile
async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<DataResponse<UserProfile>>, AppError> {
    request
        .validate()
        .map_err(|e| DomainError::Validation(first_validation_message(&e)))?;

    let command = UpdateProfileCommand::new(user.user_id, request.into());
    let profile = state.profiles.update_profile(command, &context).await?;

    Ok(Json(DataResponse {
        success: true,
        data: profile,
        message: Some("Profile updated successfully".to_string()),
    }))
}

/// POST /user/recently-viewed
async fn add_recently_viewed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
    Json(request): Json<RecentlyViewedRequest>,
) -> Result<Json<DataResponse<Product>>, AppError> {
    let product = state
        .profiles
        .record_view(user.user_id, request.product_id, &context)
        .await?;
    Ok(DataResponse::ok(product))
}

/// GET /user/recently-viewed
async fn get_recently_viewed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ProductSummary>>, AppError> {
    Ok(Json(state.profiles.recently_viewed(user.user_id).await?))
}

/// DELETE /user/recently-viewed
async fn clear_recently_viewed(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Extension(context): Extension<OperationContext>,
) -> Result<Json<AckResponse>, AppError> {
    state
        .profiles
        .clear_recently_viewed(user.user_id, &context)
        .await?;
    Ok(AckResponse::ok("Recently viewed cleared successfully"))
}
