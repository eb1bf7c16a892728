use std::sync::Arc;

use async_trait::async_trait;

use storefront_core::{ProductId, RepositoryResult};

use crate::product::{CreateProduct, Product, UpdateProductQuantity};

/// Persistence port for the catalog.
///
/// Implementations must:
/// - drop unknown ids from `find_all_by_id` without failing
/// - return rows from `find_all_by_id` in an order that is stable for a given
///   catalog (callers report "the first" offending row)
/// - in `update_quantity`, subtract in memory and write full rows back, skipping
///   ids that do not exist and never refusing a negative result
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    async fn create(&self, data: CreateProduct) -> RepositoryResult<Product>;

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Product>>;

    async fn find_all_by_id(&self, ids: &[ProductId]) -> RepositoryResult<Vec<Product>>;

    /// Take the given amounts out of stock and return the rows as written.
    async fn update_quantity(
        &self,
        products: &[UpdateProductQuantity],
    ) -> RepositoryResult<Vec<Product>>;
}

#[async_trait]
impl<S> ProductsRepository for Arc<S>
where
    S: ProductsRepository + ?Sized,
{
    async fn create(&self, data: CreateProduct) -> RepositoryResult<Product> {
        (**self).create(data).await
    }

    async fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Product>> {
        (**self).find_by_name(name).await
    }

    async fn find_all_by_id(&self, ids: &[ProductId]) -> RepositoryResult<Vec<Product>> {
        (**self).find_all_by_id(ids).await
    }

    async fn update_quantity(
        &self,
        products: &[UpdateProductQuantity],
    ) -> RepositoryResult<Vec<Product>> {
        (**self).update_quantity(products).await
    }
}
