//! Orders module.
//!
//! Order and line-item types, the order persistence ports, and the two use
//! cases built on them: placing an order against the catalog and loading one
//! back.

pub mod create_order;
pub mod find_order;
pub mod order;
pub mod repository;

pub use create_order::{
    CUSTOMER_NOT_FOUND, CreateOrderService, NO_PRODUCTS_FOUND, OrderPlan, plan_order,
};
pub use find_order::FindOrderService;
pub use order::{CreateOrderRequest, NewOrder, Order, OrderItem, RequestedProduct};
pub use repository::{OrderCheckout, OrdersRepository, SequentialCheckout};
