//! Module declaration and lifecycle
//!
//! The module is initialised once with its typed configuration and a storage
//! backend, then hands out the native client and the REST router.

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::CampusEventsApi;
use crate::domain::{Clock, Repositories, Service, SystemClock};
use crate::infra::storage::{
    InMemoryStore, SeaOrmAttendanceRepository, SeaOrmDirectoryRepository,
    SeaOrmFeedbackRepository, SeaOrmRegistrationRepository,
};
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Storage the module is wired against
#[derive(Clone)]
pub enum Backend {
    /// SeaORM over Postgres or SQLite
    Database(Arc<DatabaseConnection>),
    /// Process-local store, used for demos and tests
    InMemory(Arc<InMemoryStore>),
}

/// Campus events module
pub struct CampusEventsModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
}

impl Default for CampusEventsModule {
    fn default() -> Self {
        Self {
            config: RwLock::new(Config::default()),
            service: RwLock::new(None),
        }
    }
}

impl CampusEventsModule {
    /// Build the domain service over `backend` using the wall clock
    pub fn init(&self, config: Config, backend: Backend) -> Result<()> {
        self.init_with_clock(config, backend, Arc::new(SystemClock))
    }

    pub fn init_with_clock(&self, config: Config, backend: Backend, clock: Arc<dyn Clock>) -> Result<()> {
        if config.max_register_attempts == 0 {
            anyhow::bail!("max_register_attempts must be at least 1");
        }
        if config.default_top_students_limit == 0
            || config.default_top_students_limit > config.max_top_students_limit
        {
            anyhow::bail!(
                "default_top_students_limit must be between 1 and max_top_students_limit ({})",
                config.max_top_students_limit
            );
        }

        let repos = match backend {
            Backend::Database(conn) => Repositories {
                directory: Arc::new(SeaOrmDirectoryRepository::new(conn.clone())),
                registrations: Arc::new(SeaOrmRegistrationRepository::new(conn.clone())),
                attendance: Arc::new(SeaOrmAttendanceRepository::new(conn.clone())),
                feedback: Arc::new(SeaOrmFeedbackRepository::new(conn)),
            },
            Backend::InMemory(store) => Repositories::from_store(store),
        };

        let service = Arc::new(Service::new(repos, clock, &config));
        *self.config.write() = config;
        *self.service.write() = Some(service);

        tracing::info!("Campus events module initialized");
        Ok(())
    }

    /// Apply schema migrations
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Campus events migrations completed");
        Ok(())
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other components
    pub fn client(&self) -> Result<Arc<dyn CampusEventsApi>> {
        Ok(Arc::new(NativeClient::new(self.service()?)))
    }

    /// Register REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        tracing::info!("Registering campus events REST routes");
        Ok(crate::api::rest::routes::register_routes(router, service))
    }
}
