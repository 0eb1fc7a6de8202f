//! User management routes within the caller's tenant.

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
    middleware::AuthUser,
};
use kontor_core::auth::{UserRole, hash_password};
use kontor_db::{
    UserRepository,
    entities::users,
    repositories::{CreateUserInput, UpdateUserInput},
};

/// Creates the user routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Request body for creating or updating a user.
///
/// On update an empty password keeps the current one and a missing role
/// keeps the current role.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Role name.
    pub role: Option<String>,
}

/// Parses a requested role and checks the caller may grant it.
fn grantable_role(auth: &AuthUser, requested: Option<&str>) -> ApiResult<Option<UserRole>> {
    let role = match requested {
        None | Some("") => return Ok(None),
        Some(raw) => raw
            .parse::<UserRole>()
            .map_err(|e| ApiError::validation(e.to_string()))?,
    };

    if role.can_manage_tenants() && !auth.role().can_manage_tenants() {
        return Err(ApiError::forbidden("Only admins can grant the admin role"));
    }
    Ok(Some(role))
}

/// GET /users
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<users::Model>>> {
    let users = UserRepository::new((*state.db).clone())
        .list(auth.tenant_id())
        .await?;
    Ok(Json(users))
}

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UserRequest>,
) -> ApiResult<(StatusCode, Json<users::Model>)> {
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }
    let role = grantable_role(&auth, payload.role.as_deref())?.unwrap_or_default();

    let user = UserRepository::new((*state.db).clone())
        .create(CreateUserInput {
            tenant_id: auth.tenant_id(),
            email: payload.email,
            password_hash: hash_password(&payload.password)?,
            first_name: payload.first_name,
            last_name: payload.last_name,
            role: role.as_str().to_string(),
        })
        .await?;

    info!(user_id = %user.id, created_by = %auth.user_id(), "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<users::Model>> {
    UserRepository::new((*state.db).clone())
        .find_by_id(auth.tenant_id(), id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// PUT /users/{id}
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserRequest>,
) -> ApiResult<Json<users::Model>> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    let requested = grantable_role(&auth, payload.role.as_deref())?;

    let repo = UserRepository::new((*state.db).clone());
    let current = repo
        .find_by_id(auth.tenant_id(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let password_hash = if payload.password.is_empty() {
        None
    } else {
        Some(hash_password(&payload.password)?)
    };

    let user = repo
        .update(
            auth.tenant_id(),
            id,
            UpdateUserInput {
                email: payload.email,
                password_hash,
                first_name: payload.first_name,
                last_name: payload.last_name,
                role: requested.map_or(current.role, |r| r.as_str().to_string()),
            },
        )
        .await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    UserRepository::new((*state.db).clone())
        .delete(auth.tenant_id(), id)
        .await?;

    info!(user_id = %id, deleted_by = %auth.user_id(), "User deleted");
    Ok(Json(json!({ "message": "User deleted successfully" })))
}
