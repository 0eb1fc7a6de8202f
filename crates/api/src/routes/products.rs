//! Product catalogue routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use kontor_db::{ProductRepository, entities::products, repositories::ProductInput};

/// Creates the product routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/inventory/products",
            get(list_products).post(create_product),
        )
        .route(
            "/inventory/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Request body for creating or updating a product.
///
/// `stock_quantity` is written as given. Movements recorded through the
/// inventory transaction routes keep adjusting from whatever value is set.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    /// Product code (unique within the tenant).
    #[serde(default)]
    pub code: String,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Unit price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Quantity on hand.
    #[serde(default)]
    pub stock_quantity: i32,
}

impl ProductRequest {
    fn into_input(self) -> ApiResult<ProductInput> {
        if self.code.is_empty() || self.name.is_empty() {
            return Err(ApiError::validation("Code and name are required"));
        }
        Ok(ProductInput {
            code: self.code,
            name: self.name,
            description: self.description,
            unit_price: self.unit_price,
            stock_quantity: self.stock_quantity,
        })
    }
}

/// Response for a product.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    /// Product ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Product code.
    pub code: String,
    /// Product name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    /// Quantity on hand.
    pub stock_quantity: i32,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last update time.
    pub updated_at: DateTime<FixedOffset>,
}

impl From<products::Model> for ProductResponse {
    fn from(p: products::Model) -> Self {
        Self {
            id: p.id,
            tenant_id: p.tenant_id,
            code: p.code,
            name: p.name,
            description: p.description,
            unit_price: p.unit_price,
            stock_quantity: p.stock_quantity,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// GET /inventory/products
async fn list_products(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<ProductResponse>>> {
    let products = ProductRepository::new((*state.db).clone())
        .list(auth.tenant_id())
        .await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// POST /inventory/products
async fn create_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductResponse>)> {
    let input = payload.into_input()?;
    let product = ProductRepository::new((*state.db).clone())
        .create(auth.tenant_id(), input)
        .await?;

    info!(product_id = %product.id, code = %product.code, "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /inventory/products/{id}
async fn get_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProductResponse>> {
    ProductRepository::new((*state.db).clone())
        .find_by_id(auth.tenant_id(), id)
        .await?
        .map(|p| Json(p.into()))
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

/// PUT /inventory/products/{id}
async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductRequest>,
) -> ApiResult<Json<ProductResponse>> {
    let input = payload.into_input()?;
    let product = ProductRepository::new((*state.db).clone())
        .update(auth.tenant_id(), id, input)
        .await?;
    Ok(Json(product.into()))
}

/// DELETE /inventory/products/{id}
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    ProductRepository::new((*state.db).clone())
        .delete(auth.tenant_id(), id)
        .await?;

    info!(product_id = %id, "Product deleted");
    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
