//! Interaction repository for CRM database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use crate::entities::{contacts, customers, interactions};

/// Error types for interaction operations.
#[derive(Debug, thiserror::Error)]
pub enum InteractionError {
    /// Interaction not found.
    #[error("Interaction not found: {0}")]
    NotFound(Uuid),

    /// Referenced customer does not exist in the tenant.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Referenced contact does not exist for the customer.
    #[error("Contact not found: {0}")]
    ContactNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating an interaction.
#[derive(Debug, Clone)]
pub struct InteractionInput {
    /// Customer the interaction was with.
    pub customer_id: Uuid,
    /// Specific contact, if any.
    pub contact_id: Option<Uuid>,
    /// Kind of interaction (call, email, meeting, ...).
    pub interaction_type: String,
    /// Notes.
    pub description: String,
    /// When it happened.
    pub interaction_date: DateTimeWithTimeZone,
}

/// Interaction repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InteractionRepository {
    db: DatabaseConnection,
}

impl InteractionRepository {
    /// Creates a new interaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a customer's interactions, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_customer(
        &self,
        tenant_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<interactions::Model>, DbErr> {
        interactions::Entity::find()
            .filter(interactions::Column::TenantId.eq(tenant_id))
            .filter(interactions::Column::CustomerId.eq(customer_id))
            .order_by_desc(interactions::Column::InteractionDate)
            .all(&self.db)
            .await
    }

    /// Finds an interaction by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<interactions::Model>, DbErr> {
        interactions::Entity::find()
            .filter(interactions::Column::TenantId.eq(tenant_id))
            .filter(interactions::Column::Id.eq(id))
            .one(&self.db)
            .await
    }

    /// Records a new interaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer or contact is unknown.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        created_by: Uuid,
        input: InteractionInput,
    ) -> Result<interactions::Model, InteractionError> {
        self.ensure_references(tenant_id, &input).await?;

        let interaction = interactions::ActiveModel {
            tenant_id: Set(tenant_id),
            customer_id: Set(input.customer_id),
            contact_id: Set(input.contact_id),
            interaction_type: Set(input.interaction_type),
            description: Set(input.description),
            interaction_date: Set(input.interaction_date),
            created_by: Set(created_by),
            ..Default::default()
        };

        Ok(interaction.insert(&self.db).await?)
    }

    /// Updates an interaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the interaction, customer or contact is unknown.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: InteractionInput,
    ) -> Result<interactions::Model, InteractionError> {
        let interaction = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(InteractionError::NotFound(id))?;

        self.ensure_references(tenant_id, &input).await?;

        let mut active: interactions::ActiveModel = interaction.into();
        active.customer_id = Set(input.customer_id);
        active.contact_id = Set(input.contact_id);
        active.interaction_type = Set(input.interaction_type);
        active.description = Set(input.description);
        active.interaction_date = Set(input.interaction_date);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an interaction.
    ///
    /// # Errors
    ///
    /// Returns `InteractionError::NotFound` if no interaction matches.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), InteractionError> {
        let result = interactions::Entity::delete_many()
            .filter(interactions::Column::TenantId.eq(tenant_id))
            .filter(interactions::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(InteractionError::NotFound(id));
        }
        Ok(())
    }

    async fn ensure_references(
        &self,
        tenant_id: Uuid,
        input: &InteractionInput,
    ) -> Result<(), InteractionError> {
        let customers = customers::Entity::find()
            .filter(customers::Column::TenantId.eq(tenant_id))
            .filter(customers::Column::Id.eq(input.customer_id))
            .count(&self.db)
            .await?;
        if customers == 0 {
            return Err(InteractionError::CustomerNotFound(input.customer_id));
        }

        if let Some(contact_id) = input.contact_id {
            let contacts = contacts::Entity::find()
                .filter(contacts::Column::TenantId.eq(tenant_id))
                .filter(contacts::Column::CustomerId.eq(input.customer_id))
                .filter(contacts::Column::Id.eq(contact_id))
                .count(&self.db)
                .await?;
            if contacts == 0 {
                return Err(InteractionError::ContactNotFound(contact_id));
            }
        }

        Ok(())
    }
}
