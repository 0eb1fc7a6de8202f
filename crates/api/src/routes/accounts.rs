//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use kontor_db::{AccountRepository, entities::accounts, repositories::AccountInput};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounting/accounts",
            get(list_accounts).post(create_account),
        )
        .route(
            "/accounting/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

/// Request body for creating or updating an account.
#[derive(Debug, Deserialize)]
pub struct AccountRequest {
    /// Account code (must be unique within the tenant).
    #[serde(default)]
    pub code: String,
    /// Account name.
    #[serde(default)]
    pub name: String,
    /// Account type: asset, liability, equity, revenue, expense.
    #[serde(rename = "type", default)]
    pub account_type: String,
    /// Account description.
    #[serde(default)]
    pub description: String,
}

impl AccountRequest {
    fn into_input(self) -> ApiResult<AccountInput> {
        if self.code.is_empty() || self.name.is_empty() || self.account_type.is_empty() {
            return Err(ApiError::validation("Code, name and type are required"));
        }
        Ok(AccountInput {
            code: self.code,
            name: self.name,
            account_type: self.account_type,
            description: self.description,
        })
    }
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: String,
    /// Account description.
    pub description: String,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

impl From<accounts::Model> for AccountResponse {
    fn from(a: accounts::Model) -> Self {
        Self {
            id: a.id,
            tenant_id: a.tenant_id,
            code: a.code,
            name: a.name,
            account_type: a.account_type,
            description: a.description,
            created_at: a.created_at.to_rfc3339(),
            updated_at: a.updated_at.to_rfc3339(),
        }
    }
}

/// GET /accounting/accounts
async fn list_accounts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<AccountResponse>>> {
    let accounts = AccountRepository::new((*state.db).clone())
        .list(auth.tenant_id())
        .await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// POST /accounting/accounts
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountResponse>)> {
    let input = payload.into_input()?;
    let account = AccountRepository::new((*state.db).clone())
        .create(auth.tenant_id(), input)
        .await?;

    info!(
        tenant_id = %account.tenant_id,
        account_id = %account.id,
        code = %account.code,
        "Account created"
    );
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// GET /accounting/accounts/{id}
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AccountResponse>> {
    AccountRepository::new((*state.db).clone())
        .find_by_id(auth.tenant_id(), id)
        .await?
        .map(|a| Json(a.into()))
        .ok_or_else(|| ApiError::not_found("Account not found"))
}

/// PUT /accounting/accounts/{id}
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<Json<AccountResponse>> {
    let input = payload.into_input()?;
    let account = AccountRepository::new((*state.db).clone())
        .update(auth.tenant_id(), id, input)
        .await?;
    Ok(Json(account.into()))
}

/// DELETE /accounting/accounts/{id}
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    AccountRepository::new((*state.db).clone())
        .delete(auth.tenant_id(), id)
        .await?;

    info!(account_id = %id, "Account deleted");
    Ok(Json(json!({ "message": "Account deleted successfully" })))
}
