use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, Entity, RepositoryResult};

/// A registered customer.
///
/// Orders only need to know that the customer exists; name and email are kept
/// for the registration flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Build a fresh row from registration data, stamped with `now`.
    pub fn from_new(data: CreateCustomer, now: DateTime<Utc>) -> Self {
        Self {
            id: CustomerId::new(),
            name: data.name,
            email: data.email,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// DTO: data needed to register a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
}

/// Persistence port for customers.
#[async_trait]
pub trait CustomersRepository: Send + Sync {
    async fn create(&self, data: CreateCustomer) -> RepositoryResult<Customer>;

    async fn find_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>>;
}

#[async_trait]
impl<S> CustomersRepository for Arc<S>
where
    S: CustomersRepository + ?Sized,
{
    async fn create(&self, data: CreateCustomer) -> RepositoryResult<Customer> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>> {
        (**self).find_by_email(email).await
    }
}
