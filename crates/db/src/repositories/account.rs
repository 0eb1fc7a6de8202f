//! Account repository for chart of accounts database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{accounts, journal_entry_lines};
use crate::repositories::on_unique_violation;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists in tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// Account is referenced by journal lines.
    #[error("Cannot delete account: referenced by {0} journal entry lines")]
    InUse(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating an account.
#[derive(Debug, Clone)]
pub struct AccountInput {
    /// Account code, unique per tenant.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type (asset, liability, equity, revenue, expense, ...).
    pub account_type: String,
    /// Description.
    pub description: String,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a tenant's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
    }

    /// Finds an account by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .filter(accounts::Column::Id.eq(id))
            .one(&self.db)
            .await
    }

    /// Finds an account by code within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(
        &self,
        tenant_id: Uuid,
        code: &str,
    ) -> Result<Option<accounts::Model>, DbErr> {
        accounts::Entity::find()
            .filter(accounts::Column::TenantId.eq(tenant_id))
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::DuplicateCode` if the code exists in the tenant.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: AccountInput,
    ) -> Result<accounts::Model, AccountError> {
        if self.find_by_code(tenant_id, &input.code).await?.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        let code = input.code.clone();
        let account = accounts::ActiveModel {
            tenant_id: Set(tenant_id),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type),
            description: Set(input.description),
            ..Default::default()
        };

        account
            .insert(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || AccountError::DuplicateCode(code)))
    }

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the new code is taken.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: AccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        if input.code != account.code
            && let Some(existing) = self.find_by_code(tenant_id, &input.code).await?
            && existing.id != id
        {
            return Err(AccountError::DuplicateCode(input.code));
        }

        let code = input.code.clone();
        let mut active: accounts::ActiveModel = account.into();
        active.code = Set(input.code);
        active.name = Set(input.name);
        active.account_type = Set(input.account_type);
        active.description = Set(input.description);
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || AccountError::DuplicateCode(code)))
    }

    /// Deletes an account that no journal line references.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` or `AccountError::InUse`.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), AccountError> {
        let account = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        let references = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::AccountId.eq(account.id))
            .count(&self.db)
            .await?;
        if references > 0 {
            return Err(AccountError::InUse(references));
        }

        accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
