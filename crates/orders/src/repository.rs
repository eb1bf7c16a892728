use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::{OrderId, RepositoryResult};
use storefront_products::{ProductsRepository, UpdateProductQuantity};

use crate::order::{NewOrder, Order};

/// Persistence port for orders.
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    async fn create(&self, data: NewOrder) -> RepositoryResult<Order>;

    async fn find_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>>;
}

#[async_trait]
impl<S> OrdersRepository for Arc<S>
where
    S: OrdersRepository + ?Sized,
{
    async fn create(&self, data: NewOrder) -> RepositoryResult<Order> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        (**self).find_by_id(id).await
    }
}

/// Write side of placing an order: persist the order and take its quantities
/// out of stock.
///
/// Implementations backed by a single store should make both effects atomic.
#[async_trait]
pub trait OrderCheckout: Send + Sync {
    async fn place(
        &self,
        order: NewOrder,
        stock: Vec<UpdateProductQuantity>,
    ) -> RepositoryResult<Order>;
}

#[async_trait]
impl<S> OrderCheckout for Arc<S>
where
    S: OrderCheckout + ?Sized,
{
    async fn place(
        &self,
        order: NewOrder,
        stock: Vec<UpdateProductQuantity>,
    ) -> RepositoryResult<Order> {
        (**self).place(order, stock).await
    }
}

/// Checkout over two independent repositories: create the order, then
/// decrement stock.
///
/// Not atomic. If the decrement fails the order stays persisted and the error
/// is returned.
pub struct SequentialCheckout<O, P> {
    orders: O,
    products: P,
}

impl<O, P> SequentialCheckout<O, P> {
    pub fn new(orders: O, products: P) -> Self {
        Self { orders, products }
    }

    pub fn into_parts(self) -> (O, P) {
        (self.orders, self.products)
    }
}

#[async_trait]
impl<O, P> OrderCheckout for SequentialCheckout<O, P>
where
    O: OrdersRepository,
    P: ProductsRepository,
{
    async fn place(
        &self,
        order: NewOrder,
        stock: Vec<UpdateProductQuantity>,
    ) -> RepositoryResult<Order> {
        let created = self.orders.create(order).await?;

        if let Err(err) = self.products.update_quantity(&stock).await {
            tracing::warn!(
                order_id = %created.id,
                error = %err,
                "order persisted but stock decrement failed"
            );
            return Err(err);
        }

        Ok(created)
    }
}
