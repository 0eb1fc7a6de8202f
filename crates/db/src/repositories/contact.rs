//! Contact repository for CRM database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{contacts, customers};

/// Error types for contact operations.
#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    /// Contact not found.
    #[error("Contact not found: {0}")]
    NotFound(Uuid),

    /// Referenced customer does not exist in the tenant.
    #[error("Customer not found: {0}")]
    CustomerNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating a contact.
#[derive(Debug, Clone)]
pub struct ContactInput {
    /// Customer the contact works for.
    pub customer_id: Uuid,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: String,
    /// Job title.
    pub position: String,
}

/// Contact repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ContactRepository {
    db: DatabaseConnection,
}

impl ContactRepository {
    /// Creates a new contact repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a customer's contacts ordered by last name, then first name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_customer(
        &self,
        tenant_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<contacts::Model>, DbErr> {
        contacts::Entity::find()
            .filter(contacts::Column::TenantId.eq(tenant_id))
            .filter(contacts::Column::CustomerId.eq(customer_id))
            .order_by_asc(contacts::Column::LastName)
            .order_by_asc(contacts::Column::FirstName)
            .all(&self.db)
            .await
    }

    /// Finds a contact by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<contacts::Model>, DbErr> {
        contacts::Entity::find()
            .filter(contacts::Column::TenantId.eq(tenant_id))
            .filter(contacts::Column::Id.eq(id))
            .one(&self.db)
            .await
    }

    /// Creates a new contact for an existing customer.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::CustomerNotFound` if the customer is unknown.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: ContactInput,
    ) -> Result<contacts::Model, ContactError> {
        self.ensure_customer(tenant_id, input.customer_id).await?;

        let contact = contacts::ActiveModel {
            tenant_id: Set(tenant_id),
            customer_id: Set(input.customer_id),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            position: Set(input.position),
            ..Default::default()
        };

        Ok(contact.insert(&self.db).await?)
    }

    /// Updates a contact.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::NotFound` or `ContactError::CustomerNotFound`.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: ContactInput,
    ) -> Result<contacts::Model, ContactError> {
        let contact = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(ContactError::NotFound(id))?;

        if input.customer_id != contact.customer_id {
            self.ensure_customer(tenant_id, input.customer_id).await?;
        }

        let mut active: contacts::ActiveModel = contact.into();
        active.customer_id = Set(input.customer_id);
        active.first_name = Set(input.first_name);
        active.last_name = Set(input.last_name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.position = Set(input.position);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a contact.
    ///
    /// # Errors
    ///
    /// Returns `ContactError::NotFound` if no contact matches.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), ContactError> {
        let result = contacts::Entity::delete_many()
            .filter(contacts::Column::TenantId.eq(tenant_id))
            .filter(contacts::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ContactError::NotFound(id));
        }
        Ok(())
    }

    async fn ensure_customer(
        &self,
        tenant_id: Uuid,
        customer_id: Uuid,
    ) -> Result<(), ContactError> {
        let found = customers::Entity::find()
            .filter(customers::Column::TenantId.eq(tenant_id))
            .filter(customers::Column::Id.eq(customer_id))
            .count(&self.db)
            .await?;

        if found == 0 {
            return Err(ContactError::CustomerNotFound(customer_id));
        }
        Ok(())
    }
}
