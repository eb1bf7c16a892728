use tracing::instrument;

use storefront_core::{DomainError, ServiceResult};

use crate::customer::{CreateCustomer, Customer, CustomersRepository};

pub const EMAIL_IN_USE: &str = "This e-mail is already in use.";

/// Registers a customer, refusing an email that is already taken.
pub struct CreateCustomerService<C> {
    customers: C,
}

impl<C> CreateCustomerService<C>
where
    C: CustomersRepository,
{
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    #[instrument(skip(self, data), fields(email = %data.email), err(level = "debug"))]
    pub async fn execute(&self, data: CreateCustomer) -> ServiceResult<Customer> {
        if self.customers.find_by_email(&data.email).await?.is_some() {
            return Err(DomainError::conflict(EMAIL_IN_USE).into());
        }

        let customer = self.customers.create(data).await?;
        tracing::info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }
}
