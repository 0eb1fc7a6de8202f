//! Inventory transaction routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use kontor_core::inventory::validate_movement;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use kontor_db::{
    InventoryTransactionRepository, ProductRepository, entities::inventory_transactions,
    repositories::CreateInventoryTransactionInput,
};

/// Creates the inventory transaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/inventory/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/inventory/transactions/{id}", get(get_transaction))
        .route(
            "/inventory/transactions/product/{product_id}",
            get(list_by_product),
        )
}

/// Request body for recording a stock movement.
#[derive(Debug, Deserialize)]
pub struct InventoryTransactionRequest {
    /// Product that moved.
    pub product_id: Option<Uuid>,
    /// `IN`, `OUT`, or any other label that leaves stock unchanged.
    #[serde(default)]
    pub transaction_type: String,
    /// Non-negative magnitude.
    #[serde(default)]
    pub quantity: i32,
    /// Free-text reference.
    #[serde(default)]
    pub reference: String,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

fn repository(state: &AppState) -> InventoryTransactionRepository {
    InventoryTransactionRepository::new((*state.db).clone())
        .with_timeout(state.transaction_timeout)
}

/// GET /inventory/transactions
async fn list_transactions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<inventory_transactions::Model>>> {
    Ok(Json(repository(&state).list(auth.tenant_id()).await?))
}

/// POST /inventory/transactions
async fn create_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<InventoryTransactionRequest>,
) -> ApiResult<(StatusCode, Json<inventory_transactions::Model>)> {
    let product_id = validate_movement(
        payload.product_id,
        &payload.transaction_type,
        payload.quantity,
    )?;

    let product = ProductRepository::new((*state.db).clone())
        .find_by_id(auth.tenant_id(), product_id)
        .await?;
    if product.is_none() {
        return Err(ApiError::not_found("Product not found"));
    }

    let record = repository(&state)
        .create(CreateInventoryTransactionInput {
            tenant_id: auth.tenant_id(),
            product_id,
            transaction_type: payload.transaction_type,
            quantity: payload.quantity,
            reference: payload.reference,
            notes: payload.notes,
            created_by: auth.user_id(),
        })
        .await?;

    info!(
        inventory_transaction_id = %record.id,
        product_id = %record.product_id,
        transaction_type = %record.transaction_type,
        quantity = record.quantity,
        "Inventory transaction recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /inventory/transactions/{id}
async fn get_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<inventory_transactions::Model>> {
    repository(&state)
        .get(auth.tenant_id(), id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Inventory transaction not found"))
}

/// GET /inventory/transactions/product/{product_id}
async fn list_by_product(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<Vec<inventory_transactions::Model>>> {
    let transactions = repository(&state)
        .list_by_product(auth.tenant_id(), product_id)
        .await?;
    Ok(Json(transactions))
}
