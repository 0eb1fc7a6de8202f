//! Journal entry routes.
//!
//! Writes go through [`JournalEntryRepository`], which persists the header
//! and its lines in one bounded transaction.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use kontor_core::ledger::{LineAmounts, validate_journal};
use rust_decimal::Decimal;
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
    JournalEntryRepository,
    entities::journal_entry_lines,
    repositories::{
        CreateJournalEntryInput, JournalEntryWithLines, JournalLineInput, UpdateJournalEntryInput,
    },
};

/// Creates the journal entry routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/accounting/journal-entries",
            get(list_entries).post(create_entry),
        )
        .route(
            "/accounting/journal-entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

/// Request body for creating or updating a journal entry.
#[derive(Debug, Deserialize)]
pub struct JournalEntryRequest {
    /// Accounting date, `YYYY-MM-DD` or RFC 3339.
    pub entry_date: Option<String>,
    /// Free-text reference.
    #[serde(default)]
    pub reference: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Lines in storage order. On update this is the complete new set.
    #[serde(default)]
    pub lines: Vec<JournalLineRequest>,
}

/// One line of a journal entry request.
#[derive(Debug, Deserialize)]
pub struct JournalLineRequest {
    /// Account debited or credited.
    pub account_id: Option<Uuid>,
    /// Line description.
    #[serde(default)]
    pub description: String,
    /// Debit amount.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub credit: Decimal,
}

/// Validated request, ready for the repository.
struct ValidatedEntry {
    entry_date: NaiveDate,
    reference: String,
    description: String,
    lines: Vec<JournalLineInput>,
}

impl JournalEntryRequest {
    fn validate(self) -> ApiResult<ValidatedEntry> {
        let entry_date = match self.entry_date.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(parse_entry_date(raw)?),
        };

        let amounts: Vec<LineAmounts> = self
            .lines
            .iter()
            .map(|l| LineAmounts {
                account_id: l.account_id,
                debit: l.debit,
                credit: l.credit,
            })
            .collect();
        let entry_date = validate_journal(entry_date, &amounts)?;

        let lines = self
            .lines
            .into_iter()
            .filter_map(|l| {
                l.account_id.map(|account_id| JournalLineInput {
                    account_id,
                    description: l.description,
                    debit: l.debit,
                    credit: l.credit,
                })
            })
            .collect();

        Ok(ValidatedEntry {
            entry_date,
            reference: self.reference,
            description: self.description,
            lines,
        })
    }
}

/// Accepts a plain date or a full timestamp and keeps the date part.
fn parse_entry_date(raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ApiError::validation("Invalid entry date"))
}

/// Response for a journal entry with its lines.
#[derive(Debug, Serialize)]
pub struct JournalEntryResponse {
    /// Entry ID.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Reference.
    pub reference: String,
    /// Description.
    pub description: String,
    /// Creating user.
    pub created_by: Uuid,
    /// Lines in storage order.
    pub lines: Vec<JournalLineResponse>,
    /// Creation time.
    pub created_at: DateTime<FixedOffset>,
    /// Last update time.
    pub updated_at: DateTime<FixedOffset>,
}

/// Response for a journal line.
#[derive(Debug, Serialize)]
pub struct JournalLineResponse {
    /// Line ID.
    pub id: Uuid,
    /// Parent entry.
    pub journal_entry_id: Uuid,
    /// One-based position.
    pub line_number: i32,
    /// Account.
    pub account_id: Uuid,
    /// Line description.
    pub description: String,
    /// Debit amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub credit: Decimal,
}

impl From<journal_entry_lines::Model> for JournalLineResponse {
    fn from(l: journal_entry_lines::Model) -> Self {
        Self {
            id: l.id,
            journal_entry_id: l.journal_entry_id,
            line_number: l.line_number,
            account_id: l.account_id,
            description: l.description,
            debit: l.debit,
            credit: l.credit,
        }
    }
}

impl From<JournalEntryWithLines> for JournalEntryResponse {
    fn from(JournalEntryWithLines { entry, lines }: JournalEntryWithLines) -> Self {
        Self {
            id: entry.id,
            tenant_id: entry.tenant_id,
            entry_date: entry.entry_date,
            reference: entry.reference,
            description: entry.description,
            created_by: entry.created_by,
            lines: lines.into_iter().map(Into::into).collect(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

fn repository(state: &AppState) -> JournalEntryRepository {
    JournalEntryRepository::new((*state.db).clone()).with_timeout(state.transaction_timeout)
}

/// GET /accounting/journal-entries
async fn list_entries(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<JournalEntryResponse>>> {
    let entries = repository(&state).list(auth.tenant_id()).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// POST /accounting/journal-entries
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<JournalEntryRequest>,
) -> ApiResult<(StatusCode, Json<JournalEntryResponse>)> {
    let entry = payload.validate()?;
    let created = repository(&state)
        .create(CreateJournalEntryInput {
            tenant_id: auth.tenant_id(),
            entry_date: entry.entry_date,
            reference: entry.reference,
            description: entry.description,
            created_by: auth.user_id(),
            lines: entry.lines,
        })
        .await?;

    info!(
        tenant_id = %created.entry.tenant_id,
        journal_entry_id = %created.entry.id,
        lines = created.lines.len(),
        "Journal entry created"
    );
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// GET /accounting/journal-entries/{id}
async fn get_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<JournalEntryResponse>> {
    repository(&state)
        .get(auth.tenant_id(), id)
        .await?
        .map(|e| Json(e.into()))
        .ok_or_else(|| ApiError::not_found("Journal entry not found"))
}

/// PUT /accounting/journal-entries/{id}
async fn update_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<JournalEntryRequest>,
) -> ApiResult<Json<JournalEntryResponse>> {
    let entry = payload.validate()?;
    let updated = repository(&state)
        .update(UpdateJournalEntryInput {
            tenant_id: auth.tenant_id(),
            id,
            entry_date: entry.entry_date,
            reference: entry.reference,
            description: entry.description,
            lines: entry.lines,
        })
        .await?;

    info!(journal_entry_id = %id, lines = updated.lines.len(), "Journal entry updated");
    Ok(Json(updated.into()))
}

/// DELETE /accounting/journal-entries/{id}
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    repository(&state).delete(auth.tenant_id(), id).await?;

    info!(journal_entry_id = %id, "Journal entry deleted");
    Ok(Json(json!({ "message": "Journal entry deleted successfully" })))
}
