//! `storefront-core` — shared building blocks.
//!
//! Identifiers, the entity trait and the error model used by every storefront
//! crate. No infrastructure concerns live here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{
    DomainError, DomainResult, RepositoryError, RepositoryResult, ServiceError, ServiceResult,
};
pub use id::{CustomerId, OrderId, ProductId};
