//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Probed by the health check. `None` when running without a store.
    pub database: Option<Arc<Database>>,
    /// Health check and login rate limiting. Rate limiting is off when `None`.
    pub cache: Option<Arc<Cache>>,
}

impl AppState {
    /// Wire services over the database pool.
    pub fn from_config(database: Arc<Database>, cache: Arc<Cache>, config: &Config) -> Self {
        let services = Arc::new(Services::from_connection(database.get_connection(), config));

        Self {
            services,
            database: Some(database),
            cache: Some(cache),
        }
    }

    /// State over injected services only, without infrastructure.
    pub fn new(services: Arc<dyn ServiceContainer>) -> Self {
        Self {
            services,
            database: None,
            cache: None,
        }
    }
}
