//! Products module.
//!
//! The catalog entity, the DTOs used to create and restock it, the repository
//! port and the product registration service.

pub mod product;
pub mod repository;
pub mod service;

pub use product::{
    CreateProduct, PRICE_SCALE, Product, UpdateProductQuantity, apply_decrements,
};
pub use repository::ProductsRepository;
pub use service::{CreateProductService, PRODUCT_NAME_TAKEN};
