use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use storefront_core::{CustomerId, RepositoryError, RepositoryResult};
use storefront_customers::{CreateCustomer, Customer, CustomersRepository};

use super::map_sqlx_error;

/// Postgres-backed customers repository (`customers` table).
#[derive(Debug, Clone)]
pub struct PgCustomersRepository {
    pool: Arc<PgPool>,
}

impl PgCustomersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

/// Map a `customers` row; `prefix` selects aliased columns (e.g. `customer_`).
pub(crate) fn customer_from_row(row: &PgRow, prefix: &str) -> RepositoryResult<Customer> {
    let col = |name: &str| format!("{prefix}{name}");
    let decode = |e: sqlx::Error| RepositoryError::Decode(format!("customer row: {e}"));

    Ok(Customer {
        id: CustomerId::from_uuid(row.try_get::<Uuid, _>(col("id").as_str()).map_err(decode)?),
        name: row.try_get(col("name").as_str()).map_err(decode)?,
        email: row.try_get(col("email").as_str()).map_err(decode)?,
        created_at: row.try_get(col("created_at").as_str()).map_err(decode)?,
        updated_at: row.try_get(col("updated_at").as_str()).map_err(decode)?,
    })
}

#[async_trait]
impl CustomersRepository for PgCustomersRepository {
    #[instrument(skip(self, data), err)]
    async fn create(&self, data: CreateCustomer) -> RepositoryResult<Customer> {
        let customer = Customer::from_new(data, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_customer", e))?;

        Ok(customer)
    }

    #[instrument(skip(self), fields(customer_id = %id), err)]
    async fn find_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_id", e))?;

        row.map(|r| customer_from_row(&r, "")).transpose()
    }

    #[instrument(skip(self), err)]
    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_email", e))?;

        row.map(|r| customer_from_row(&r, "")).transpose()
    }
}
