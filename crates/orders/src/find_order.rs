use tracing::instrument;

use storefront_core::{OrderId, ServiceResult};

use crate::order::Order;
use crate::repository::OrdersRepository;

/// Loads a placed order with its customer and line items.
pub struct FindOrderService<O> {
    orders: O,
}

impl<O> FindOrderService<O>
where
    O: OrdersRepository,
{
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    /// `Ok(None)` when no order has this id.
    #[instrument(skip(self), fields(order_id = %id), err(level = "debug"))]
    pub async fn execute(&self, id: OrderId) -> ServiceResult<Option<Order>> {
        Ok(self.orders.find_by_id(id).await?)
    }
}
