//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{admin_middleware, auth_middleware},
};

pub mod accounts;
pub mod auth;
pub mod contacts;
pub mod customers;
pub mod health;
pub mod interactions;
pub mod inventory_transactions;
pub mod journal_entries;
pub mod products;
pub mod tenants;
pub mod users;

/// Creates the API router: public, admin and tenant-scoped routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Layers run outside-in: the token is checked before the role.
    let admin_routes = tenants::admin_routes()
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let tenant_routes = Router::new()
        .merge(users::routes())
        .merge(accounts::routes())
        .merge(journal_entries::routes())
        .merge(products::routes())
        .merge(inventory_transactions::routes())
        .merge(customers::routes())
        .merge(contacts::routes())
        .merge(interactions::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(tenants::public_routes())
        .merge(admin_routes)
        .merge(tenant_routes)
}
