use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;

use storefront_core::RepositoryResult;
use storefront_orders::{NewOrder, Order, OrderCheckout};
use storefront_products::UpdateProductQuantity;

use super::map_sqlx_error;
use super::orders::insert_order;
use super::products::decrement_stock;

/// Order checkout in a single transaction: the order, its items and the stock
/// decrement commit together or not at all.
///
/// Rows are not locked between the caller's stock check and this write.
#[derive(Debug, Clone)]
pub struct PgCheckout {
    pool: Arc<PgPool>,
}

impl PgCheckout {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl OrderCheckout for PgCheckout {
    #[instrument(
        skip(self, order, stock),
        fields(customer_id = %order.customer.id, items = order.items.len()),
        err
    )]
    async fn place(
        &self,
        order: NewOrder,
        stock: Vec<UpdateProductQuantity>,
    ) -> RepositoryResult<Order> {
        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let order = insert_order(&mut tx, order, now).await?;
        let updated = decrement_stock(&mut tx, &stock, now).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        tracing::debug!(order_id = %order.id, products = updated.len(), "checkout committed");
        Ok(order)
    }
}
