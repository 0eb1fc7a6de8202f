//! Authentication routes for login and self-registration.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use serde::Serialize;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};
use kontor_core::auth::{UserRole, hash_password, verify_password};
use kontor_db::{
    TenantRepository, UserRepository, entities::users, repositories::CreateUserInput,
};
use kontor_shared::{AppError, LoginRequest, RegisterRequest};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
}

/// Token plus the user it was issued for.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token.
    pub token: String,
    /// Authenticated user.
    pub user: users::Model,
}

/// POST /auth/login - Authenticate a user of a tenant and return a token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(tenant_id) = payload.tenant_id else {
        return Err(credentials_required());
    };
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(credentials_required());
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let Some(user) = user_repo.find_by_email(tenant_id, &payload.email).await? else {
        info!(tenant_id = %tenant_id, "Login attempt for non-existent user");
        return Err(ApiError::unauthorized("Invalid credentials"));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        info!(user_id = %user.id, "Failed login attempt - invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state
        .jwt_service
        .generate_token(user.id, user.tenant_id, &user.email, &user.role)?;

    info!(user_id = %user.id, "User logged in successfully");
    Ok(Json(AuthResponse { token, user }))
}

/// POST /auth/register - Create a user in an existing tenant.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Some(tenant_id) = payload.tenant_id else {
        return Err(credentials_required());
    };
    if payload.email.is_empty() || payload.password.is_empty() {
        return Err(credentials_required());
    }

    let role = match payload.role.as_deref() {
        None | Some("") => UserRole::default(),
        Some(raw) => raw
            .parse::<UserRole>()
            .map_err(|e| ApiError::validation(e.to_string()))?,
    };
    if !role.is_self_assignable() {
        return Err(ApiError::forbidden("This role cannot be self-assigned"));
    }

    let tenant_repo = TenantRepository::new((*state.db).clone());
    if tenant_repo.find_by_id(tenant_id).await?.is_none() {
        return Err(ApiError::not_found("Tenant not found"));
    }

    let user_repo = UserRepository::new((*state.db).clone());
    if user_repo.email_exists(tenant_id, &payload.email, None).await? {
        return Err(AppError::Conflict("User already exists".to_string()).into());
    }

    let password_hash = hash_password(&payload.password)?;
    let user = user_repo
        .create(CreateUserInput {
            tenant_id,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            role: role.as_str().to_string(),
        })
        .await?;

    let token = state
        .jwt_service
        .generate_token(user.id, user.tenant_id, &user.email, &user.role)?;

    info!(user_id = %user.id, tenant_id = %tenant_id, "User registered");
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

fn credentials_required() -> ApiError {
    ApiError::validation("Tenant ID, email and password are required")
}
