//! Router tests driven through `tower::ServiceExt::oneshot`.
//!
//! The database is a `SeaORM` mock: requests that are rejected before any
//! query need no results queued, the rest get exactly what they read.

#![allow(clippy::uninlined_format_args)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use kontor_api::{AppState, create_router};
use kontor_db::entities::{
    inventory_transactions, journal_entries, journal_entry_lines, products,
};
use kontor_shared::{JwtConfig, JwtService};

const SECRET: &str = "router-test-secret";

fn jwt() -> JwtService {
    JwtService::new(JwtConfig {
        secret: SECRET.to_string(),
        expires_hours: 1,
    })
}

fn app(db: DatabaseConnection) -> Router {
    create_router(AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt()),
        transaction_timeout: Duration::from_secs(5),
    })
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn token(role: &str) -> String {
    jwt()
        .generate_token(Uuid::new_v4(), Uuid::new_v4(), "clerk@example.com", role)
        .unwrap()
}

fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(uri: &str, bearer: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn stamp() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2025, 6, 1, 8, 0, 0)
        .unwrap()
}

fn is_rfc3339(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok())
}

fn product_row(tenant_id: Uuid) -> products::Model {
    products::Model {
        id: Uuid::new_v4(),
        tenant_id,
        code: "WID-001".to_string(),
        name: "Widget".to_string(),
        description: String::new(),
        unit_price: Decimal::new(1250, 2),
        stock_quantity: 100,
        created_at: stamp(),
        updated_at: stamp(),
    }
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health_is_public() {
    let (status, body) = send(app(empty_db()), get("/api/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let (status, body) = send(app(empty_db()), get("/api/users", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_forged_token_is_unauthorized() {
    let forged = JwtService::new(JwtConfig {
        secret: "someone-else".to_string(),
        expires_hours: 1,
    })
    .generate_token(Uuid::new_v4(), Uuid::new_v4(), "x@example.com", "admin")
    .unwrap();

    let (status, body) = send(
        app(empty_db()),
        get("/api/inventory/products", Some(&forged)),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_admin_routes_reject_plain_users() {
    let (status, body) = send(
        app(empty_db()),
        get("/api/admin/tenants", Some(&token("user"))),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_admin_routes_require_a_token_first() {
    let (status, _) = send(app(empty_db()), get("/api/admin/tenants", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_journal_entry_without_lines_is_rejected() {
    let (status, body) = send(
        app(empty_db()),
        post(
            "/api/accounting/journal-entries",
            Some(&token("user")),
            &json!({ "entry_date": "2025-01-15", "lines": [] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "At least one journal entry line is required");
}

#[tokio::test]
async fn test_journal_entry_without_date_is_rejected() {
    let (status, body) = send(
        app(empty_db()),
        post(
            "/api/accounting/journal-entries",
            Some(&token("user")),
            &json!({ "lines": [{ "account_id": Uuid::new_v4(), "debit": 5 }] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Entry date is required");
}

#[tokio::test]
async fn test_missing_journal_entry_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<journal_entries::Model>::new()])
        .into_connection();

    let uri = format!("/api/accounting/journal-entries/{}", Uuid::new_v4());
    let (status, body) = send(app(db), get(&uri, Some(&token("user")))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Journal entry not found");
}

#[tokio::test]
async fn test_inventory_movement_for_unknown_product_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<products::Model>::new()])
        .into_connection();

    let (status, body) = send(
        app(db),
        post(
            "/api/inventory/transactions",
            Some(&token("user")),
            &json!({
                "product_id": Uuid::new_v4(),
                "transaction_type": "IN",
                "quantity": 10
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
async fn test_inventory_movement_requires_product_and_type() {
    let (status, body) = send(
        app(empty_db()),
        post(
            "/api/inventory/transactions",
            Some(&token("user")),
            &json!({ "quantity": 10 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Product ID and transaction type are required");
}

#[tokio::test]
async fn test_inventory_movement_rejects_negative_quantity() {
    let (status, _) = send(
        app(empty_db()),
        post(
            "/api/inventory/transactions",
            Some(&token("user")),
            &json!({
                "product_id": Uuid::new_v4(),
                "transaction_type": "OUT",
                "quantity": -1
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_requires_all_fields() {
    let (status, body) = send(
        app(empty_db()),
        post("/api/auth/login", None, &json!({ "email": "a@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Tenant ID, email and password are required");
}

#[tokio::test]
async fn test_admin_role_cannot_be_self_registered() {
    let (status, _) = send(
        app(empty_db()),
        post(
            "/api/auth/register",
            None,
            &json!({
                "tenant_id": Uuid::new_v4(),
                "email": "boss@example.com",
                "password": "secret",
                "role": "admin"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_created_journal_entry_wire_shape() {
    let entry_id = Uuid::new_v4();
    let tenant_id = Uuid::new_v4();
    let cash = Uuid::new_v4();
    let capital = Uuid::new_v4();

    let header = journal_entries::Model {
        id: entry_id,
        tenant_id,
        entry_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        reference: "JV-1".to_string(),
        description: "Opening capital".to_string(),
        created_by: Uuid::new_v4(),
        created_at: stamp(),
        updated_at: stamp(),
    };
    let line = |line_number: i32, account_id: Uuid, debit: Decimal, credit: Decimal| {
        journal_entry_lines::Model {
            id: Uuid::new_v4(),
            tenant_id,
            journal_entry_id: entry_id,
            line_number,
            account_id,
            description: String::new(),
            debit,
            credit,
            created_at: stamp(),
            updated_at: stamp(),
        }
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![header]])
        .append_query_results([vec![line(1, cash, Decimal::new(10050, 2), Decimal::ZERO)]])
        .append_query_results([vec![line(2, capital, Decimal::ZERO, Decimal::new(10050, 2))]])
        .into_connection();

    let (status, body) = send(
        app(db),
        post(
            "/api/accounting/journal-entries",
            Some(&token("user")),
            &json!({
                "entry_date": "2025-01-15",
                "reference": "JV-1",
                "description": "Opening capital",
                "lines": [
                    { "account_id": cash, "debit": 100.5 },
                    { "account_id": capital, "credit": 100.5 }
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(entry_id));
    assert_eq!(body["entry_date"], "2025-01-15");
    assert!(is_rfc3339(&body["created_at"]));
    assert!(is_rfc3339(&body["updated_at"]));

    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["line_number"], 1);
    assert_eq!(lines[0]["account_id"], json!(cash));
    assert_eq!(lines[1]["line_number"], 2);
    assert_eq!(lines[1]["account_id"], json!(capital));

    assert!(lines[0]["debit"].is_number());
    assert!(lines[0]["credit"].is_number());
    assert_eq!(lines[0]["debit"], json!(100.5));
    assert_eq!(lines[1]["credit"], json!(100.5));
}

#[tokio::test]
async fn test_recorded_movement_wire_shape_and_stock_update() {
    let tenant_id = Uuid::new_v4();
    let product = product_row(tenant_id);
    let record = inventory_transactions::Model {
        id: Uuid::new_v4(),
        tenant_id,
        product_id: product.id,
        transaction_type: "IN".to_string(),
        quantity: 12,
        reference: "PO-77".to_string(),
        notes: String::new(),
        created_by: Uuid::new_v4(),
        created_at: stamp(),
        updated_at: stamp(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![product.clone()]])
        .append_query_results([vec![record.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let (status, body) = send(
        app(db.clone()),
        post(
            "/api/inventory/transactions",
            Some(&token("user")),
            &json!({
                "product_id": product.id,
                "transaction_type": "IN",
                "quantity": 12,
                "reference": "PO-77"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], json!(record.id));
    assert_eq!(body["product_id"], json!(product.id));
    assert_eq!(body["quantity"], 12);
    assert_eq!(body["transaction_type"], "IN");
    assert!(is_rfc3339(&body["created_at"]));

    let log = format!("{:?}", db.into_transaction_log());
    assert!(log.contains("Int(Some(12))"));
    assert!(log.contains("COMMIT"));
}

#[tokio::test]
async fn test_created_product_prices_are_numbers() {
    let tenant_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<products::Model>::new(), vec![product_row(tenant_id)]])
        .into_connection();

    let (status, body) = send(
        app(db),
        post(
            "/api/inventory/products",
            Some(&token("user")),
            &json!({ "code": "WID-001", "name": "Widget", "unit_price": 12.5 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["unit_price"].is_number());
    assert_eq!(body["unit_price"], json!(12.5));
    assert!(is_rfc3339(&body["created_at"]));
}
