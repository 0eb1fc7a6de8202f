//! Inventory transaction repository.
//!
//! Recording a movement and adjusting the product's cached
//! `stock_quantity` happen in one database transaction. The adjustment is
//! a relative `stock_quantity = stock_quantity + delta` update so that
//! concurrent movements on the same product serialize on the row lock
//! instead of overwriting each other. No floor is applied: an `OUT` may
//! take stock below zero.

use std::time::Duration;

use kontor_core::inventory::stock_delta;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::{Expr, ExprTrait},
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::{inventory_transactions, products};
use crate::repositories::DEFAULT_TRANSACTION_TIMEOUT;

/// Error types for inventory transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// The stock update matched no product in the tenant.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// The transactional scope did not finish in time and was rolled back.
    #[error("Inventory transaction write timed out after {0:?}")]
    Timeout(Duration),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording an inventory transaction.
#[derive(Debug, Clone)]
pub struct CreateInventoryTransactionInput {
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Product that moved.
    pub product_id: Uuid,
    /// Movement type, stored verbatim. Only `IN` and `OUT` change stock.
    pub transaction_type: String,
    /// Non-negative magnitude.
    pub quantity: i32,
    /// Free-text reference.
    pub reference: String,
    /// Free-text notes.
    pub notes: String,
    /// Acting user.
    pub created_by: Uuid,
}

/// Inventory transaction repository.
#[derive(Debug, Clone)]
pub struct InventoryTransactionRepository {
    db: DatabaseConnection,
    timeout: Duration,
}

impl InventoryTransactionRepository {
    /// Creates a new inventory transaction repository.
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

    /// Records a movement and applies its stock delta atomically.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::ProductNotFound` if a stock-moving type
    /// targets no product in the tenant. Any failure, including a timeout,
    /// leaves neither the record nor the stock change behind.
    pub async fn create(
        &self,
        input: CreateInventoryTransactionInput,
    ) -> Result<inventory_transactions::Model, InventoryError> {
        let scope = self.create_in_transaction(&input);
        tokio::time::timeout(self.timeout, scope)
            .await
            .map_err(|_| InventoryError::Timeout(self.timeout))?
    }

    /// Finds a transaction by id within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<inventory_transactions::Model>, DbErr> {
        inventory_transactions::Entity::find()
            .filter(inventory_transactions::Column::TenantId.eq(tenant_id))
            .filter(inventory_transactions::Column::Id.eq(id))
            .one(&self.db)
            .await
    }

    /// Lists a tenant's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        tenant_id: Uuid,
    ) -> Result<Vec<inventory_transactions::Model>, DbErr> {
        inventory_transactions::Entity::find()
            .filter(inventory_transactions::Column::TenantId.eq(tenant_id))
            .order_by_desc(inventory_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists one product's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_product(
        &self,
        tenant_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<inventory_transactions::Model>, DbErr> {
        inventory_transactions::Entity::find()
            .filter(inventory_transactions::Column::TenantId.eq(tenant_id))
            .filter(inventory_transactions::Column::ProductId.eq(product_id))
            .order_by_desc(inventory_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    async fn create_in_transaction(
        &self,
        input: &CreateInventoryTransactionInput,
    ) -> Result<inventory_transactions::Model, InventoryError> {
        let txn = self.db.begin().await?;

        let record = inventory_transactions::ActiveModel {
            tenant_id: Set(input.tenant_id),
            product_id: Set(input.product_id),
            transaction_type: Set(input.transaction_type.clone()),
            quantity: Set(input.quantity),
            reference: Set(input.reference.clone()),
            notes: Set(input.notes.clone()),
            created_by: Set(input.created_by),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let delta = stock_delta(&record.transaction_type, record.quantity);
        if delta != 0 {
            apply_stock_delta(&txn, input.tenant_id, input.product_id, delta).await?;
        }

        txn.commit().await?;

        debug!(
            inventory_transaction_id = %record.id,
            product_id = %record.product_id,
            delta,
            "Inventory transaction persisted"
        );
        Ok(record)
    }
}

/// Adds `delta` to the product's stock in place.
async fn apply_stock_delta(
    txn: &DatabaseTransaction,
    tenant_id: Uuid,
    product_id: Uuid,
    delta: i32,
) -> Result<(), InventoryError> {
    let result = products::Entity::update_many()
        .col_expr(
            products::Column::StockQuantity,
            Expr::col(products::Column::StockQuantity).add(delta),
        )
        .col_expr(
            products::Column::UpdatedAt,
            Expr::current_timestamp().into(),
        )
        .filter(products::Column::TenantId.eq(tenant_id))
        .filter(products::Column::Id.eq(product_id))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(InventoryError::ProductNotFound(product_id));
    }

    Ok(())
}
