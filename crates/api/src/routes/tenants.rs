//! Tenant routes: public lookup by subdomain and admin management.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};
use kontor_db::{TenantRepository, entities::tenants, repositories::TenantInput};

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/tenants/{subdomain}", get(get_by_subdomain))
}

/// Routes that require the admin role (middleware applied externally).
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/tenants", get(list_tenants).post(create_tenant))
        .route(
            "/admin/tenants/{id}",
            get(get_tenant).put(update_tenant).delete(delete_tenant),
        )
}

/// Request body for creating or updating a tenant.
#[derive(Debug, Deserialize)]
pub struct TenantRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Unique subdomain.
    #[serde(default)]
    pub subdomain: String,
}

impl TenantRequest {
    fn into_input(self) -> ApiResult<TenantInput> {
        if self.name.is_empty() || self.subdomain.is_empty() {
            return Err(ApiError::validation("Name and subdomain are required"));
        }
        Ok(TenantInput {
            name: self.name,
            subdomain: self.subdomain,
        })
    }
}

/// GET /tenants/{subdomain}
async fn get_by_subdomain(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
) -> ApiResult<Json<tenants::Model>> {
    TenantRepository::new((*state.db).clone())
        .find_by_subdomain(&subdomain)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tenant not found"))
}

/// GET /admin/tenants
async fn list_tenants(State(state): State<AppState>) -> ApiResult<Json<Vec<tenants::Model>>> {
    Ok(Json(TenantRepository::new((*state.db).clone()).list().await?))
}

/// POST /admin/tenants
async fn create_tenant(
    State(state): State<AppState>,
    Json(payload): Json<TenantRequest>,
) -> ApiResult<(StatusCode, Json<tenants::Model>)> {
    let input = payload.into_input()?;
    let tenant = TenantRepository::new((*state.db).clone())
        .create(input)
        .await?;

    info!(tenant_id = %tenant.id, subdomain = %tenant.subdomain, "Tenant created");
    Ok((StatusCode::CREATED, Json(tenant)))
}

/// GET /admin/tenants/{id}
async fn get_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<tenants::Model>> {
    TenantRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tenant not found"))
}

/// PUT /admin/tenants/{id}
async fn update_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TenantRequest>,
) -> ApiResult<Json<tenants::Model>> {
    let input = payload.into_input()?;
    let tenant = TenantRepository::new((*state.db).clone())
        .update(id, input)
        .await?;
    Ok(Json(tenant))
}

/// DELETE /admin/tenants/{id}
async fn delete_tenant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    TenantRepository::new((*state.db).clone()).delete(id).await?;

    info!(tenant_id = %id, "Tenant deleted");
    Ok(Json(json!({ "message": "Tenant deleted successfully" })))
}
