//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services and infrastructure.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Database, KeyValueCache};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// All use cases
    pub services: Arc<dyn ServiceContainer>,
    /// Database handle, used by the health check
    pub database: Arc<Database>,
    /// Redis cache
    pub cache: Arc<dyn KeyValueCache>,
}

impl AppState {
    /// Build the production state: every service backed by the database pool.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<dyn KeyValueCache>,
        config: &Config,
    ) -> Self {
        let services = Services::from_connection(database.get_connection(), cache.clone(), config);

        Self {
            services: Arc::new(services),
            database,
            cache,
        }
    }

    /// Create state from an existing container (tests inject mocks here).
    pub fn new(
        services: Arc<dyn ServiceContainer>,
        database: Arc<Database>,
        cache: Arc<dyn KeyValueCache>,
    ) -> Self {
        Self {
            services,
            database,
            cache,
        }
    }
}
