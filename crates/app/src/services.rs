use std::sync::Arc;

use anyhow::Context;

use storefront_core::{OrderId, ServiceResult};
use storefront_customers::{CreateCustomer, CreateCustomerService, Customer};
use storefront_infra::postgres::{
    self, PgCheckout, PgCustomersRepository, PgOrdersRepository, PgPool, PgProductsRepository,
};
use storefront_infra::{AppConfig, Backend, InMemoryStore};
use storefront_orders::{CreateOrderRequest, CreateOrderService, FindOrderService, Order};
use storefront_products::{CreateProduct, CreateProductService, Product};

type InMemoryOrderService =
    CreateOrderService<Arc<InMemoryStore>, Arc<InMemoryStore>, Arc<InMemoryStore>>;

type PgOrderService = CreateOrderService<PgCustomersRepository, PgProductsRepository, PgCheckout>;

/// The use-case services, wired to one storage backend.
pub enum AppServices {
    InMemory {
        store: Arc<InMemoryStore>,
        create_customer: CreateCustomerService<Arc<InMemoryStore>>,
        create_product: CreateProductService<Arc<InMemoryStore>>,
        create_order: InMemoryOrderService,
        find_order: FindOrderService<Arc<InMemoryStore>>,
    },
    Postgres {
        create_customer: CreateCustomerService<PgCustomersRepository>,
        create_product: CreateProductService<PgProductsRepository>,
        create_order: PgOrderService,
        find_order: FindOrderService<PgOrdersRepository>,
    },
}

impl AppServices {
    pub fn in_memory() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        AppServices::InMemory {
            create_customer: CreateCustomerService::new(store.clone()),
            create_product: CreateProductService::new(store.clone()),
            create_order: CreateOrderService::new(store.clone(), store.clone(), store.clone()),
            find_order: FindOrderService::new(store.clone()),
            store,
        }
    }

    /// Wire services to an already-migrated Postgres pool.
    pub fn postgres(pool: PgPool) -> Self {
        AppServices::Postgres {
            create_customer: CreateCustomerService::new(PgCustomersRepository::new(pool.clone())),
            create_product: CreateProductService::new(PgProductsRepository::new(pool.clone())),
            create_order: CreateOrderService::new(
                PgCustomersRepository::new(pool.clone()),
                PgProductsRepository::new(pool.clone()),
                PgCheckout::new(pool.clone()),
            ),
            find_order: FindOrderService::new(PgOrdersRepository::new(pool)),
        }
    }

    /// Build services for the configured backend. For Postgres this connects
    /// and creates any missing tables.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.backend {
            Backend::InMemory => {
                tracing::info!("using in-memory storage");
                Ok(Self::in_memory())
            }
            Backend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres backend")?;
                let pool = postgres::connect(url, config.max_connections)
                    .await
                    .context("failed to connect to postgres")?;
                postgres::schema::migrate(&pool)
                    .await
                    .context("failed to initialize schema")?;
                tracing::info!("using postgres storage");
                Ok(Self::postgres(pool))
            }
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            AppServices::InMemory { .. } => Backend::InMemory,
            AppServices::Postgres { .. } => Backend::Postgres,
        }
    }

    /// The backing store, when running in memory.
    pub fn in_memory_store(&self) -> Option<&Arc<InMemoryStore>> {
        match self {
            AppServices::InMemory { store, .. } => Some(store),
            AppServices::Postgres { .. } => None,
        }
    }

    pub async fn create_customer(&self, data: CreateCustomer) -> ServiceResult<Customer> {
        match self {
            AppServices::InMemory {
                create_customer, ..
            } => create_customer.execute(data).await,
            AppServices::Postgres {
                create_customer, ..
            } => create_customer.execute(data).await,
        }
    }

    pub async fn create_product(&self, data: CreateProduct) -> ServiceResult<Product> {
        match self {
            AppServices::InMemory { create_product, .. } => create_product.execute(data).await,
            AppServices::Postgres { create_product, .. } => create_product.execute(data).await,
        }
    }

    pub async fn create_order(&self, request: CreateOrderRequest) -> ServiceResult<Order> {
        match self {
            AppServices::InMemory { create_order, .. } => create_order.execute(request).await,
            AppServices::Postgres { create_order, .. } => create_order.execute(request).await,
        }
    }

    pub async fn find_order(&self, id: OrderId) -> ServiceResult<Option<Order>> {
        match self {
            AppServices::InMemory { find_order, .. } => find_order.execute(id).await,
            AppServices::Postgres { find_order, .. } => find_order.execute(id).await,
        }
    }
}
