//! Tenant repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::tenants;
use crate::repositories::on_unique_violation;

/// Error types for tenant operations.
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    /// Another tenant already uses this subdomain.
    #[error("Subdomain '{0}' already exists")]
    DuplicateSubdomain(String),

    /// Tenant not found.
    #[error("Tenant not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating a tenant.
#[derive(Debug, Clone)]
pub struct TenantInput {
    /// Display name.
    pub name: String,
    /// Unique subdomain.
    pub subdomain: String,
}

/// Tenant repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    db: DatabaseConnection,
}

impl TenantRepository {
    /// Creates a new tenant repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all tenants ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<tenants::Model>, DbErr> {
        tenants::Entity::find()
            .order_by_asc(tenants::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a tenant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<tenants::Model>, DbErr> {
        tenants::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a tenant by subdomain.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_subdomain(
        &self,
        subdomain: &str,
    ) -> Result<Option<tenants::Model>, DbErr> {
        tenants::Entity::find()
            .filter(tenants::Column::Subdomain.eq(subdomain))
            .one(&self.db)
            .await
    }

    /// Creates a new tenant.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::DuplicateSubdomain` if the subdomain is taken.
    pub async fn create(&self, input: TenantInput) -> Result<tenants::Model, TenantError> {
        if self.subdomain_taken(&input.subdomain, None).await? {
            return Err(TenantError::DuplicateSubdomain(input.subdomain));
        }

        let subdomain = input.subdomain.clone();
        let tenant = tenants::ActiveModel {
            name: Set(input.name),
            subdomain: Set(input.subdomain),
            ..Default::default()
        };

        tenant
            .insert(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || TenantError::DuplicateSubdomain(subdomain)))
    }

    /// Updates a tenant's name and subdomain.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant is missing or the new subdomain is taken.
    pub async fn update(
        &self,
        id: Uuid,
        input: TenantInput,
    ) -> Result<tenants::Model, TenantError> {
        let tenant = self
            .find_by_id(id)
            .await?
            .ok_or(TenantError::NotFound(id))?;

        if input.subdomain != tenant.subdomain
            && self.subdomain_taken(&input.subdomain, Some(id)).await?
        {
            return Err(TenantError::DuplicateSubdomain(input.subdomain));
        }

        let subdomain = input.subdomain.clone();
        let mut active: tenants::ActiveModel = tenant.into();
        active.name = Set(input.name);
        active.subdomain = Set(input.subdomain);
        active.updated_at = Set(chrono::Utc::now().into());

        active
            .update(&self.db)
            .await
            .map_err(|e| on_unique_violation(e, || TenantError::DuplicateSubdomain(subdomain)))
    }

    /// Deletes a tenant and, through cascades, everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `TenantError::NotFound` if no tenant has this id.
    pub async fn delete(&self, id: Uuid) -> Result<(), TenantError> {
        let result = tenants::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(TenantError::NotFound(id));
        }
        Ok(())
    }

    async fn subdomain_taken(
        &self,
        subdomain: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = tenants::Entity::find().filter(tenants::Column::Subdomain.eq(subdomain));
        if let Some(id) = exclude {
            query = query.filter(tenants::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}
