use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use storefront_core::{OrderId, ProductId, RepositoryError, RepositoryResult};
use storefront_orders::{NewOrder, Order, OrderItem, OrdersRepository};

use super::customers::customer_from_row;
use super::map_sqlx_error;

/// Postgres-backed orders repository (`orders` + `orders_products` tables).
#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    pool: Arc<PgPool>,
}

impl PgOrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

/// Insert the order row and one `orders_products` row per item.
pub(crate) async fn insert_order(
    conn: &mut PgConnection,
    data: NewOrder,
    now: DateTime<Utc>,
) -> RepositoryResult<Order> {
    let order = Order::from_new(data, now);

    sqlx::query(
        r#"
        INSERT INTO orders (id, customer_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(order.id.as_uuid())
    .bind(order.customer.id.as_uuid())
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await
    .map_err(|e| map_sqlx_error("insert_order", e))?;

    for (idx, item) in order.items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO orders_products
                (id, order_id, product_id, line_no, price, quantity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(order.id.as_uuid())
        .bind(item.product_id.as_uuid())
        .bind((idx + 1) as i32)
        .bind(item.price)
        .bind(item.quantity)
        .bind(order.created_at)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("insert_order_item", e))?;
    }

    Ok(order)
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    #[instrument(
        skip(self, data),
        fields(customer_id = %data.customer.id, items = data.items.len()),
        err
    )]
    async fn create(&self, data: NewOrder) -> RepositoryResult<Order> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let order = insert_order(&mut tx, data, Utc::now()).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;
        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn find_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        let Some(row) = sqlx::query(
            r#"
            SELECT
                o.id,
                o.created_at,
                o.updated_at,
                c.id          AS customer_id,
                c.name        AS customer_name,
                c.email       AS customer_email,
                c.created_at  AS customer_created_at,
                c.updated_at  AS customer_updated_at
            FROM orders o
            JOIN customers c ON c.id = o.customer_id
            WHERE o.id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order_by_id", e))?
        else {
            return Ok(None);
        };

        let decode = |e: sqlx::Error| RepositoryError::Decode(format!("order row: {e}"));
        let customer = customer_from_row(&row, "customer_")?;

        let item_rows = sqlx::query(
            r#"
            SELECT product_id, price, quantity
            FROM orders_products
            WHERE order_id = $1
            ORDER BY line_no ASC
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_order_items", e))?;

        let items = item_rows
            .iter()
            .map(|r| -> RepositoryResult<OrderItem> {
                Ok(OrderItem {
                    product_id: ProductId::from_uuid(
                        r.try_get::<Uuid, _>("product_id").map_err(decode)?,
                    ),
                    price: r.try_get("price").map_err(decode)?,
                    quantity: r.try_get("quantity").map_err(decode)?,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(Some(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id").map_err(decode)?),
            customer,
            items,
            created_at: row.try_get("created_at").map_err(decode)?,
            updated_at: row.try_get("updated_at").map_err(decode)?,
        }))
    }
}
