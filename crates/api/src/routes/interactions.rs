//! CRM interaction routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use kontor_db::{InteractionRepository, entities::interactions, repositories::InteractionInput};

/// Creates the interaction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/crm/interactions", post(create_interaction))
        .route(
            "/crm/interactions/{id}",
            get(get_interaction)
                .put(update_interaction)
                .delete(delete_interaction),
        )
}

/// Request body for creating or updating an interaction.
#[derive(Debug, Deserialize)]
pub struct InteractionRequest {
    /// Customer the interaction was with.
    pub customer_id: Option<Uuid>,
    /// Specific contact, if any.
    pub contact_id: Option<Uuid>,
    /// Kind of interaction.
    #[serde(default)]
    pub interaction_type: String,
    /// Notes.
    #[serde(default)]
    pub description: String,
    /// When it happened (RFC 3339).
    pub interaction_date: Option<DateTime<FixedOffset>>,
}

impl InteractionRequest {
    fn into_input(self) -> ApiResult<InteractionInput> {
        let (Some(customer_id), Some(interaction_date)) = (self.customer_id, self.interaction_date)
        else {
            return Err(required());
        };
        if self.interaction_type.is_empty() {
            return Err(required());
        }
        Ok(InteractionInput {
            customer_id,
            contact_id: self.contact_id,
            interaction_type: self.interaction_type,
            description: self.description,
            interaction_date,
        })
    }
}

fn required() -> ApiError {
    ApiError::validation("Customer ID, interaction type and interaction date are required")
}

/// POST /crm/interactions
async fn create_interaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<InteractionRequest>,
) -> ApiResult<(StatusCode, Json<interactions::Model>)> {
    let input = payload.into_input()?;
    let interaction = InteractionRepository::new((*state.db).clone())
        .create(auth.tenant_id(), auth.user_id(), input)
        .await?;

    info!(
        interaction_id = %interaction.id,
        customer_id = %interaction.customer_id,
        "Interaction recorded"
    );
    Ok((StatusCode::CREATED, Json(interaction)))
}

/// GET /crm/interactions/{id}
async fn get_interaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<interactions::Model>> {
    InteractionRepository::new((*state.db).clone())
        .find_by_id(auth.tenant_id(), id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Interaction not found"))
}

/// PUT /crm/interactions/{id}
async fn update_interaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<InteractionRequest>,
) -> ApiResult<Json<interactions::Model>> {
    let input = payload.into_input()?;
    let interaction = InteractionRepository::new((*state.db).clone())
        .update(auth.tenant_id(), id, input)
        .await?;
    Ok(Json(interaction))
}

/// DELETE /crm/interactions/{id}
async fn delete_interaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    InteractionRepository::new((*state.db).clone())
        .delete(auth.tenant_id(), id)
        .await?;

    info!(interaction_id = %id, "Interaction deleted");
    Ok(Json(json!({ "message": "Interaction deleted successfully" })))
}
