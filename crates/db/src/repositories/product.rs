//! Product repository for database operations.
//!
//! Product updates write `stock_quantity` as given. That path bypasses the
//! inventory transaction log, so the cached quantity can drift from the sum
//! of recorded movements.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::products;
use crate::repositories::on_unique_violation;

/// Error types for product operations.
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    /// Product code already exists in tenant.
    #[error("Product code '{0}' already exists")]
    DuplicateCode(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    /// Product code, unique per tenant.
    pub code: String,
    /// Product name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Unit price.
    pub unit_price: Decimal,
    /// Quantity on hand.
    pub stock_quantity: i32,
}

/// Product repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    /// Creates a new product repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a tenant's products ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::TenantId.eq(tenant_id))
            .order_by_asc(products::Column::Code)
            .all(&self.db)
            .await
    }

    /// Finds a product by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::TenantId.eq(tenant_id))
            .filter(products::Column::Id.eq(id))
            .one(&self.db)
            .await
    }

    /// Finds a product by code within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(
        &self,
        tenant_id: Uuid,
        code: &str,
    ) -> Result<Option<products::Model>, DbErr> {
        products::Entity::find()
            .filter(products::Column::TenantId.eq(tenant_id))
            .filter(products::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Creates a new product.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::DuplicateCode` if the code exists in the tenant.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: ProductInput,
    ) -> Result<products::Model, ProductError> {
        if self.find_by_code(tenant_id, &input.code).await?.is_some() {
            return Err(ProductError::DuplicateCode(input.code));
        }

        let code = input.code.clone();
        let product = products::ActiveModel {
            tenant_id: Set(tenant_id),
            code: Set(input.code),
            name: Set(input.name),
            description: Set(input.description),
            unit_price: Set(input.unit_price),
            stock_quantity: Set(input.stock_quantity),
            ..Default::default()
        };

        product
            .insert(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || ProductError::DuplicateCode(code)))
    }

    /// Updates a product, including its stock quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is missing or the new code is taken.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: ProductInput,
    ) -> Result<products::Model, ProductError> {
        let product = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(ProductError::NotFound(id))?;

        if input.code != product.code
            && let Some(existing) = self.find_by_code(tenant_id, &input.code).await?
            && existing.id != id
        {
            return Err(ProductError::DuplicateCode(input.code));
        }

        let code = input.code.clone();
        let mut active: products::ActiveModel = product.into();
        active.code = Set(input.code);
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.unit_price = Set(input.unit_price);
        active.stock_quantity = Set(input.stock_quantity);
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || ProductError::DuplicateCode(code)))
    }

    /// Deletes a product together with its inventory transactions.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::NotFound` if no product matches.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), ProductError> {
        let result = products::Entity::delete_many()
            .filter(products::Column::TenantId.eq(tenant_id))
            .filter(products::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }
}
