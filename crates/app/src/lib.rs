//! Application wiring: repositories into services, per configured backend.

pub mod services;

pub use services::AppServices;

use storefront_infra::AppConfig;

/// Load configuration, install tracing and build the services.
pub async fn bootstrap() -> anyhow::Result<AppServices> {
    let config = AppConfig::from_env()?;
    storefront_observability::init_with(config.log_format);
    tracing::info!(backend = ?config.backend, "configuration loaded");
    AppServices::from_config(&config).await
}
