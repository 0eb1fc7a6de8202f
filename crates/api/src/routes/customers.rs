//! CRM customer routes.

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
use kontor_db::{
    ContactRepository, CustomerRepository, InteractionRepository,
    entities::{contacts, customers, interactions},
    repositories::CustomerInput,
};

/// Creates the customer routes (requires auth middleware to be applied externally).
///
/// The nested listings share the `{id}` segment name with the detail route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/crm/customers", get(list_customers).post(create_customer))
        .route(
            "/crm/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/crm/customers/{id}/contacts", get(list_contacts))
        .route("/crm/customers/{id}/interactions", get(list_interactions))
}

/// Request body for creating or updating a customer.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    /// Customer name.
    #[serde(default)]
    pub name: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Phone.
    #[serde(default)]
    pub phone: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
}

impl CustomerRequest {
    fn into_input(self) -> ApiResult<CustomerInput> {
        if self.name.is_empty() {
            return Err(ApiError::validation("Name is required"));
        }
        Ok(CustomerInput {
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address,
        })
    }
}

/// Customer detail with its contacts embedded.
#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    /// Customer fields.
    #[serde(flatten)]
    pub customer: customers::Model,
    /// Contacts ordered by last name, then first name.
    pub contacts: Vec<contacts::Model>,
}

/// GET /crm/customers
async fn list_customers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<customers::Model>>> {
    let customers = CustomerRepository::new((*state.db).clone())
        .list(auth.tenant_id())
        .await?;
    Ok(Json(customers))
}

/// POST /crm/customers
async fn create_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CustomerRequest>,
) -> ApiResult<(StatusCode, Json<customers::Model>)> {
    let input = payload.into_input()?;
    let customer = CustomerRepository::new((*state.db).clone())
        .create(auth.tenant_id(), input)
        .await?;

    info!(customer_id = %customer.id, "Customer created");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /crm/customers/{id}
async fn get_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CustomerDetail>> {
    let found = CustomerRepository::new((*state.db).clone())
        .find_with_contacts(auth.tenant_id(), id)
        .await?
        .ok_or_else(|| ApiError::not_found("Customer not found"))?;

    Ok(Json(CustomerDetail {
        customer: found.customer,
        contacts: found.contacts,
    }))
}

/// PUT /crm/customers/{id}
async fn update_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerRequest>,
) -> ApiResult<Json<customers::Model>> {
    let input = payload.into_input()?;
    let customer = CustomerRepository::new((*state.db).clone())
        .update(auth.tenant_id(), id, input)
        .await?;
    Ok(Json(customer))
}

/// DELETE /crm/customers/{id}
async fn delete_customer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    CustomerRepository::new((*state.db).clone())
        .delete(auth.tenant_id(), id)
        .await?;

    info!(customer_id = %id, "Customer deleted");
    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}

async fn ensure_customer(state: &AppState, tenant_id: Uuid, id: Uuid) -> ApiResult<()> {
    CustomerRepository::new((*state.db).clone())
        .find_by_id(tenant_id, id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::not_found("Customer not found"))
}

/// GET /crm/customers/{id}/contacts
async fn list_contacts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<contacts::Model>>> {
    ensure_customer(&state, auth.tenant_id(), id).await?;
    let contacts = ContactRepository::new((*state.db).clone())
        .list_by_customer(auth.tenant_id(), id)
        .await?;
    Ok(Json(contacts))
}

/// GET /crm/customers/{id}/interactions
async fn list_interactions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<interactions::Model>>> {
    ensure_customer(&state, auth.tenant_id(), id).await?;
    let interactions = InteractionRepository::new((*state.db).clone())
        .list_by_customer(auth.tenant_id(), id)
        .await?;
    Ok(Json(interactions))
}
