//! Infrastructure layer: storage backends and configuration.

pub mod config;
pub mod in_memory;
pub mod postgres;


pub use config::{AppConfig, Backend, ConfigError};
pub use in_memory::InMemoryStore;
