//! In-memory storage for tests/dev.
//!
//! One `InMemoryStore` backs every repository port. Catalog rows are kept in
//! insertion order, which is the order `find_all_by_id` returns them in.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use storefront_core::{CustomerId, OrderId, ProductId, RepositoryError, RepositoryResult};
use storefront_customers::{CreateCustomer, Customer, CustomersRepository};
use storefront_orders::{NewOrder, Order, OrderCheckout, OrdersRepository};
use storefront_products::{
    CreateProduct, Product, ProductsRepository, UpdateProductQuantity, apply_decrements,
};

#[derive(Debug, Default)]
struct State {
    customers: Vec<Customer>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl State {
    fn decrement(&mut self, requested: &[UpdateProductQuantity]) -> Vec<Product> {
        let now = Utc::now();
        let ids: Vec<ProductId> = requested.iter().map(|r| r.id).collect();
        let current: Vec<Product> = self
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect();

        let updated = apply_decrements(current, requested, now);
        for row in &updated {
            if let Some(slot) = self.products.iter_mut().find(|p| p.id == row.id) {
                *slot = row.clone();
            }
        }
        updated
    }
}

/// In-memory store implementing the customer, product and order ports.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))
    }

    /// Number of persisted orders.
    pub fn order_count(&self) -> RepositoryResult<usize> {
        Ok(self.read()?.orders.len())
    }
}

#[async_trait]
impl CustomersRepository for InMemoryStore {
    async fn create(&self, data: CreateCustomer) -> RepositoryResult<Customer> {
        let mut state = self.write()?;
        if state.customers.iter().any(|c| c.email == data.email) {
            return Err(RepositoryError::Constraint(format!(
                "customers.email '{}' already exists",
                data.email
            )));
        }

        let customer = Customer::from_new(data, Utc::now());
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: CustomerId) -> RepositoryResult<Option<Customer>> {
        Ok(self.read()?.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<Customer>> {
        Ok(self
            .read()?
            .customers
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }
}

#[async_trait]
impl ProductsRepository for InMemoryStore {
    async fn create(&self, data: CreateProduct) -> RepositoryResult<Product> {
        let mut state = self.write()?;
        if state.products.iter().any(|p| p.name == data.name) {
            return Err(RepositoryError::Constraint(format!(
                "products.name '{}' already exists",
                data.name
            )));
        }

        let product = Product::from_new(data, Utc::now());
        state.products.push(product.clone());
        Ok(product)
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Product>> {
        Ok(self
            .read()?
            .products
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn find_all_by_id(&self, ids: &[ProductId]) -> RepositoryResult<Vec<Product>> {
        Ok(self
            .read()?
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update_quantity(
        &self,
        products: &[UpdateProductQuantity],
    ) -> RepositoryResult<Vec<Product>> {
        Ok(self.write()?.decrement(products))
    }
}

#[async_trait]
impl OrdersRepository for InMemoryStore {
    async fn create(&self, data: NewOrder) -> RepositoryResult<Order> {
        let order = Order::from_new(data, Utc::now());
        self.write()?.orders.push(order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> RepositoryResult<Option<Order>> {
        Ok(self.read()?.orders.iter().find(|o| o.id == id).cloned())
    }
}

/// Both effects happen under one write lock.
#[async_trait]
impl OrderCheckout for InMemoryStore {
    async fn place(
        &self,
        order: NewOrder,
        stock: Vec<UpdateProductQuantity>,
    ) -> RepositoryResult<Order> {
        let mut state = self.write()?;
        let order = Order::from_new(order, Utc::now());
        state.orders.push(order.clone());
        state.decrement(&stock);
        Ok(order)
    }
}
