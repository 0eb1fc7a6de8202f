//! CRM contact routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
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
use kontor_db::{ContactRepository, entities::contacts, repositories::ContactInput};

/// Creates the contact routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/crm/contacts", post(create_contact))
        .route(
            "/crm/contacts/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
}

/// Request body for creating or updating a contact.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    /// Customer the contact works for.
    pub customer_id: Option<Uuid>,
    /// First name.
    #[serde(default)]
    pub first_name: String,
    /// Last name.
    #[serde(default)]
    pub last_name: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Phone.
    #[serde(default)]
    pub phone: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
}

impl ContactRequest {
    fn into_input(self) -> ApiResult<ContactInput> {
        let customer_id = match self.customer_id {
            Some(id) if !self.first_name.is_empty() && !self.last_name.is_empty() => id,
            _ => {
                return Err(ApiError::validation(
                    "Customer ID, first name and last name are required",
                ));
            }
        };
        Ok(ContactInput {
            customer_id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            position: self.position,
        })
    }
}

/// POST /crm/contacts
async fn create_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<ContactRequest>,
) -> ApiResult<(StatusCode, Json<contacts::Model>)> {
    let input = payload.into_input()?;
    let contact = ContactRepository::new((*state.db).clone())
        .create(auth.tenant_id(), input)
        .await?;

    info!(contact_id = %contact.id, customer_id = %contact.customer_id, "Contact created");
    Ok((StatusCode::CREATED, Json(contact)))
}

/// GET /crm/contacts/{id}
async fn get_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<contacts::Model>> {
    ContactRepository::new((*state.db).clone())
        .find_by_id(auth.tenant_id(), id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Contact not found"))
}

/// PUT /crm/contacts/{id}
async fn update_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactRequest>,
) -> ApiResult<Json<contacts::Model>> {
    let input = payload.into_input()?;
    let contact = ContactRepository::new((*state.db).clone())
        .update(auth.tenant_id(), id, input)
        .await?;
    Ok(Json(contact))
}

/// DELETE /crm/contacts/{id}
async fn delete_contact(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    ContactRepository::new((*state.db).clone())
        .delete(auth.tenant_id(), id)
        .await?;

    info!(contact_id = %id, "Contact deleted");
    Ok(Json(json!({ "message": "Contact deleted successfully" })))
}
