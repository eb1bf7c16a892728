use tracing::instrument;

use storefront_core::{DomainError, ServiceResult};

use crate::product::{CreateProduct, Product};
use crate::repository::ProductsRepository;

pub const PRODUCT_NAME_TAKEN: &str = "There is already a product with this name.";

/// Adds a product to the catalog. Names are unique.
pub struct CreateProductService<P> {
    products: P,
}

impl<P> CreateProductService<P>
where
    P: ProductsRepository,
{
    pub fn new(products: P) -> Self {
        Self { products }
    }

    #[instrument(skip(self, data), fields(name = %data.name), err(level = "debug"))]
    pub async fn execute(&self, data: CreateProduct) -> ServiceResult<Product> {
        if self.products.find_by_name(&data.name).await?.is_some() {
            return Err(DomainError::conflict(PRODUCT_NAME_TAKEN).into());
        }

        let product = self.products.create(data).await?;
        tracing::info!(
            product_id = %product.id,
            quantity = product.quantity,
            "product created"
        );
        Ok(product)
    }
}
