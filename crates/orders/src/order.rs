use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{CustomerId, Entity, OrderId, ProductId};
use storefront_customers::Customer;

/// Order line: product, quantity, and the unit price captured when the order
/// was placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Catalog price at order time. Later catalog changes do not touch it.
    pub price: Decimal,
}

impl OrderItem {
    /// `price * quantity`, or `None` if that does not fit in a `Decimal`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a fresh order from checkout data, stamped with `now`.
    pub fn from_new(data: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id: OrderId::new(),
            customer: data.customer,
            items: data.items,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer.id
    }

    /// Sum of the line subtotals; `None` on overflow.
    pub fn total(&self) -> Option<Decimal> {
        self.items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.subtotal()?))
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// DTO: an order ready to be persisted (customer resolved, items priced).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: Customer,
    pub items: Vec<OrderItem>,
}

/// One `(product, quantity)` pair of an incoming order request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedProduct {
    pub id: ProductId,
    pub quantity: i64,
}

/// Incoming order request, already deserialized by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub products: Vec<RequestedProduct>,
}

impl CreateOrderRequest {
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_customers::CreateCustomer;

    fn test_customer() -> Customer {
        Customer::from_new(
            CreateCustomer {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let order = Order::from_new(
            NewOrder {
                customer: test_customer(),
                items: vec![
                    OrderItem {
                        product_id: ProductId::new(),
                        quantity: 3,
                        price: Decimal::new(1050, 2),
                    },
                    OrderItem {
                        product_id: ProductId::new(),
                        quantity: 1,
                        price: Decimal::new(200, 2),
                    },
                ],
            },
            Utc::now(),
        );

        assert_eq!(order.total(), Some(Decimal::new(3350, 2)));
    }

    #[test]
    fn total_is_none_when_a_subtotal_overflows() {
        let order = Order::from_new(
            NewOrder {
                customer: test_customer(),
                items: vec![OrderItem {
                    product_id: ProductId::new(),
                    quantity: 2,
                    price: Decimal::MAX,
                }],
            },
            Utc::now(),
        );

        assert_eq!(order.items[0].subtotal(), None);
        assert_eq!(order.total(), None);
    }

    #[test]
    fn empty_order_totals_zero() {
        let order = Order::from_new(
            NewOrder {
                customer: test_customer(),
                items: vec![],
            },
            Utc::now(),
        );
        assert_eq!(order.total(), Some(Decimal::ZERO));
    }

    #[test]
    fn customer_id_reads_through_customer() {
        let customer = test_customer();
        let order = Order::from_new(
            NewOrder {
                customer: customer.clone(),
                items: vec![],
            },
            Utc::now(),
        );
        assert_eq!(order.customer_id(), customer.id);
    }
}
