//! Customer repository for CRM database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{contacts, customers};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating a customer.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    /// Customer name.
    pub name: String,
    /// Email.
    pub email: String,
    /// Phone.
    pub phone: String,
    /// Postal address.
    pub address: String,
}

/// Customer with its contacts.
#[derive(Debug, Clone)]
pub struct CustomerWithContacts {
    /// Customer record.
    pub customer: customers::Model,
    /// Contacts ordered by last name, then first name.
    pub contacts: Vec<contacts::Model>,
}

/// Customer repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a tenant's customers ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::TenantId.eq(tenant_id))
            .order_by_asc(customers::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a customer by ID within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find()
            .filter(customers::Column::TenantId.eq(tenant_id))
            .filter(customers::Column::Id.eq(id))
            .one(&self.db)
            .await
    }

    /// Finds a customer and loads its contacts.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn find_with_contacts(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<CustomerWithContacts>, DbErr> {
        let Some(customer) = self.find_by_id(tenant_id, id).await? else {
            return Ok(None);
        };

        let contacts = contacts::Entity::find()
            .filter(contacts::Column::TenantId.eq(tenant_id))
            .filter(contacts::Column::CustomerId.eq(customer.id))
            .order_by_asc(contacts::Column::LastName)
            .order_by_asc(contacts::Column::FirstName)
            .all(&self.db)
            .await?;

        Ok(Some(CustomerWithContacts { customer, contacts }))
    }

    /// Creates a new customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: CustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let customer = customers::ActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            ..Default::default()
        };

        Ok(customer.insert(&self.db).await?)
    }

    /// Updates a customer.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer matches.
    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: CustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let customer = self
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(CustomerError::NotFound(id))?;

        let mut active: customers::ActiveModel = customer.into();
        active.name = Set(input.name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a customer with its contacts and interactions.
    ///
    /// # Errors
    ///
    /// Returns `CustomerError::NotFound` if no customer matches.
    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<(), CustomerError> {
        let result = customers::Entity::delete_many()
            .filter(customers::Column::TenantId.eq(tenant_id))
            .filter(customers::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CustomerError::NotFound(id));
        }
        Ok(())
    }
}
