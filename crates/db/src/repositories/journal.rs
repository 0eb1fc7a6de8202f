//! Journal entry repository.
//!
//! A journal entry is a header plus an ordered set of debit/credit lines.
//! Every write here runs inside one database transaction bounded by a
//! timeout: header and lines are persisted together or not at all. The
//! transaction handle rolls back on drop, so any early return, error or
//! elapsed timeout leaves the stored state as it was before the call.

use std::future::Future;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{journal_entries, journal_entry_lines};
use crate::repositories::DEFAULT_TRANSACTION_TIMEOUT;

/// Error types for journal entry operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// No journal entry with this id in the tenant.
    #[error("Journal entry not found: {0}")]
    NotFound(Uuid),

    /// The transactional scope did not finish in time and was rolled back.
    #[error("Journal entry write timed out after {0:?}")]
    Timeout(Duration),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalEntryInput {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Free-text reference (voucher number, invoice, ...).
    pub reference: String,
    /// Free-text description.
    pub description: String,
    /// Acting user.
    pub created_by: Uuid,
    /// Lines in the order they should be stored.
    pub lines: Vec<JournalLineInput>,
}

/// Input for replacing a journal entry's header fields and line set.
#[derive(Debug, Clone)]
pub struct UpdateJournalEntryInput {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Entry to update.
    pub id: Uuid,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Free-text reference.
    pub reference: String,
    /// Free-text description.
    pub description: String,
    /// Complete replacement line set.
    pub lines: Vec<JournalLineInput>,
}

/// Input for a single journal line.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// Account debited or credited.
    pub account_id: Uuid,
    /// Line description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// Journal entry header with its lines in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntryWithLines {
    /// Header row.
    pub entry: journal_entries::Model,
    /// Line rows.
    pub lines: Vec<journal_entry_lines::Model>,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalEntryRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl JournalEntryRepository {
    /// Creates a new journal entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            timeout: DEFAULT_TRANSACTION_TIMEOUT,
        }
    }

    /// Sets the upper bound for each transactional write.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates a journal entry with all its lines atomically.
    ///
    /// Identities and timestamps come from column defaults. Lines are
    /// numbered in input order. Input is trusted: presence checks happen
    /// before this call.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails or the scope times out; nothing
    /// is persisted in that case.
    pub async fn create(
        &self,
        input: CreateJournalEntryInput,
    ) -> Result<JournalEntryWithLines, JournalError> {
        self.bounded(self.create_in_transaction(&input)).await
    }

    /// Updates the header and replaces the whole line set atomically.
    ///
    /// Existing lines are deleted and the new set inserted with fresh
    /// identities. Lines absent from the input are gone afterwards.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NotFound` if the entry does not exist in the
    /// tenant. Any failure rolls back the header update too.
    pub async fn update(
        &self,
        input: UpdateJournalEntryInput,
    ) -> Result<JournalEntryWithLines, JournalError> {
        self.bounded(self.update_in_transaction(&input)).await
    }

    /// Deletes a journal entry: lines first, then the header.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::NotFound` if the entry does not exist in the
    /// tenant; the line deletion is rolled back in that case.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), JournalError> {
        self.bounded(self.delete_in_transaction(tenant_id, id)).await
    }

    /// Finds a journal entry with its lines.
    ///
    /// Returns `Ok(None)` when no entry matches the tenant and id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<JournalEntryWithLines>, JournalError> {
        let Some(entry) = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .filter(journal_entries::Column::Id.eq(id))
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let lines = self.find_lines(&entry).await?;
        Ok(Some(JournalEntryWithLines { entry, lines }))
    }

    /// Lists a tenant's journal entries, newest entry date first.
    ///
    /// Lines are loaded with one query per entry.
    ///
    /// # Errors
    ///
    /// Returns an error if any database query fails.
    pub async fn list(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<JournalEntryWithLines>, JournalError> {
        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(entries.len());
        for entry in entries {
            let lines = self.find_lines(&entry).await?;
            result.push(JournalEntryWithLines { entry, lines });
        }

        Ok(result)
    }

    async fn create_in_transaction(
        &self,
        input: &CreateJournalEntryInput,
    ) -> Result<JournalEntryWithLines, JournalError> {
        let txn = self.db.begin().await?;

        let entry = journal_entries::ActiveModel {
            tenant_id: Set(input.tenant_id),
            entry_date: Set(input.entry_date),
            reference: Set(input.reference.clone()),
            description: Set(input.description.clone()),
            created_by: Set(input.created_by),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let lines = insert_lines(&txn, &entry, &input.lines).await?;

        txn.commit().await?;

        debug!(
            journal_entry_id = %entry.id,
            tenant_id = %entry.tenant_id,
            lines = lines.len(),
            "Journal entry persisted"
        );
        Ok(JournalEntryWithLines { entry, lines })
    }

    async fn update_in_transaction(
        &self,
        input: &UpdateJournalEntryInput,
    ) -> Result<JournalEntryWithLines, JournalError> {
        let txn = self.db.begin().await?;

        let entry = journal_entries::Entity::update_many()
            .col_expr(
                journal_entries::Column::EntryDate,
                Expr::value(input.entry_date),
            )
            .col_expr(
                journal_entries::Column::Reference,
                Expr::value(input.reference.clone()),
            )
            .col_expr(
                journal_entries::Column::Description,
                Expr::value(input.description.clone()),
            )
            .col_expr(
                journal_entries::Column::UpdatedAt,
                Expr::current_timestamp().into(),
            )
            .filter(journal_entries::Column::TenantId.eq(input.tenant_id))
            .filter(journal_entries::Column::Id.eq(input.id))
            .exec_with_returning(&txn)
            .await?
            .into_iter()
            .next()
            .ok_or(JournalError::NotFound(input.id))?;

        let removed = journal_entry_lines::Entity::delete_many()
            .filter(journal_entry_lines::Column::TenantId.eq(input.tenant_id))
            .filter(journal_entry_lines::Column::JournalEntryId.eq(entry.id))
            .exec(&txn)
            .await?;

        let lines = insert_lines(&txn, &entry, &input.lines).await?;

        txn.commit().await?;

        debug!(
            journal_entry_id = %entry.id,
            removed = removed.rows_affected,
            inserted = lines.len(),
            "Journal entry lines replaced"
        );
        Ok(JournalEntryWithLines { entry, lines })
    }

    async fn delete_in_transaction(&self, tenant_id: Uuid, id: Uuid) -> Result<(), JournalError> {
        let txn = self.db.begin().await?;

        journal_entry_lines::Entity::delete_many()
            .filter(journal_entry_lines::Column::TenantId.eq(tenant_id))
            .filter(journal_entry_lines::Column::JournalEntryId.eq(id))
            .exec(&txn)
            .await?;

        let header = journal_entries::Entity::delete_many()
            .filter(journal_entries::Column::TenantId.eq(tenant_id))
            .filter(journal_entries::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if header.rows_affected == 0 {
            return Err(JournalError::NotFound(id));
        }

        txn.commit().await?;
        Ok(())
    }

    async fn find_lines(
        &self,
        entry: &journal_entries::Model,
    ) -> Result<Vec<journal_entry_lines::Model>, DbErr> {
        journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::TenantId.eq(entry.tenant_id))
            .filter(journal_entry_lines::Column::JournalEntryId.eq(entry.id))
            .order_by_asc(journal_entry_lines::Column::LineNumber)
            .all(&self.db)
            .await
    }

    /// Runs a transactional scope under the configured timeout.
    ///
    /// On timeout the scope future is dropped, which drops its open
    /// transaction and rolls it back.
    async fn bounded<T>(
        &self,
        scope: impl Future<Output = Result<T, JournalError>>,
    ) -> Result<T, JournalError> {
        tokio::time::timeout(self.timeout, scope)
            .await
            .map_err(|_| JournalError::Timeout(self.timeout))?
    }
}

/// Inserts lines for an entry in input order, numbering them from 1.
async fn insert_lines(
    txn: &DatabaseTransaction,
    entry: &journal_entries::Model,
    lines: &[JournalLineInput],
) -> Result<Vec<journal_entry_lines::Model>, DbErr> {
    let mut inserted = Vec::with_capacity(lines.len());

    for (line_number, line) in (1_i32..).zip(lines) {
        let row = journal_entry_lines::ActiveModel {
            tenant_id: Set(entry.tenant_id),
            journal_entry_id: Set(entry.id),
            line_number: Set(line_number),
            account_id: Set(line.account_id),
            description: Set(line.description.clone()),
            debit: Set(line.debit),
            credit: Set(line.credit),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        inserted.push(row);
    }

    Ok(inserted)
}
