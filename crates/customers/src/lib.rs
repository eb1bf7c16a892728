//! Customers module.
//!
//! The customer entity, the repository port that stores it and the service that
//! registers new customers.

pub mod customer;
pub mod service;

pub use customer::{CreateCustomer, Customer, CustomersRepository};
pub use service::{CreateCustomerService, EMAIL_IN_USE};
