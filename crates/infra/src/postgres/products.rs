use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use storefront_core::{ProductId, RepositoryError, RepositoryResult};
use storefront_products::{
    CreateProduct, Product, ProductsRepository, UpdateProductQuantity, apply_decrements,
};

use super::map_sqlx_error;

/// Postgres-backed catalog repository (`products` table).
///
/// `find_all_by_id` returns rows by `(created_at, id)`.
#[derive(Debug, Clone)]
pub struct PgProductsRepository {
    pool: Arc<PgPool>,
}

impl PgProductsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn product_from_row(row: &PgRow) -> RepositoryResult<Product> {
    let decode = |e: sqlx::Error| RepositoryError::Decode(format!("product row: {e}"));

    Ok(Product {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id").map_err(decode)?),
        name: row.try_get("name").map_err(decode)?,
        price: row.try_get("price").map_err(decode)?,
        quantity: row.try_get("quantity").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

fn to_uuids(ids: &[ProductId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

async fn select_by_ids(
    conn: &mut PgConnection,
    ids: &[ProductId],
) -> RepositoryResult<Vec<Product>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, price, quantity, created_at, updated_at
        FROM products
        WHERE id = ANY($1)
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(to_uuids(ids))
    .fetch_all(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("select_products_by_id", e))?;

    rows.iter().map(product_from_row).collect()
}

/// Read the named rows, subtract in memory and write every matched row back.
///
/// Runs on whatever connection it is given so it can share a transaction with
/// the order insert.
pub(crate) async fn decrement_stock(
    conn: &mut PgConnection,
    requested: &[UpdateProductQuantity],
    now: DateTime<Utc>,
) -> RepositoryResult<Vec<Product>> {
    let ids: Vec<ProductId> = requested.iter().map(|r| r.id).collect();
    let current = select_by_ids(conn, &ids).await?;
    let updated = apply_decrements(current, requested, now);

    for product in &updated {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $2, price = $3, quantity = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.updated_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("update_product_quantity", e))?;
    }

    Ok(updated)
}

#[async_trait]
impl ProductsRepository for PgProductsRepository {
    #[instrument(skip(self, data), fields(name = %data.name), err)]
    async fn create(&self, data: CreateProduct) -> RepositoryResult<Product> {
        let product = Product::from_new(data, Utc::now());

        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, price, quantity, created_at, updated_at
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        product_from_row(&row)
    }

    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product_by_name", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()), err)]
    async fn find_all_by_id(&self, ids: &[ProductId]) -> RepositoryResult<Vec<Product>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("acquire", e))?;
        select_by_ids(&mut conn, ids).await
    }

    #[instrument(skip(self, products), fields(requested = products.len()), err)]
    async fn update_quantity(
        &self,
        products: &[UpdateProductQuantity],
    ) -> RepositoryResult<Vec<Product>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let updated = decrement_stock(&mut tx, products, Utc::now()).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(updated)
    }
}
