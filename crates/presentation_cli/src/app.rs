//! Composition root
//!
//! Wires the SQLite stores, generator, fault injector and interceptor from an
//! [`AppConfig`].

use std::sync::Arc;

use application::{CallLog, DatasetService, IdentityService, ModeController};
use infrastructure::{
    AppConfig, FaultInjector, HostingClientFactory, RequestInterceptor, SqliteDatasetStore,
    SqliteModeStore, SqliteSessionStore, SyntheticDataGenerator, UnconfiguredHostingClient,
    create_pool,
};
use tracing::debug;

/// Everything a command needs
pub struct App {
    pub modes: Arc<ModeController>,
    pub datasets: Arc<DatasetService>,
    pub identities: IdentityService,
    pub hosting: RequestInterceptor,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("datasets", &self.datasets)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn build(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = Arc::new(create_pool(&config.database)?);
        let simulation = &config.simulation;

        let modes = Arc::new(ModeController::new(
            Arc::new(SqliteModeStore::new(Arc::clone(&pool))),
            simulation.mode_defaults()?,
        ));

        let generator = simulation
            .generator_seed
            .map_or_else(SyntheticDataGenerator::new, SyntheticDataGenerator::with_seed);
        let datasets = Arc::new(DatasetService::new(
            Arc::new(SqliteDatasetStore::new(Arc::clone(&pool))),
            Arc::new(generator),
            simulation.generation.clone(),
        ));

        let identities = IdentityService::new(
            Arc::new(SqliteSessionStore::new(pool)),
            Arc::clone(&modes),
        );

        let hosting = RequestInterceptor::new(
            Arc::clone(&modes),
            HostingClientFactory::new(Arc::new(UnconfiguredHostingClient), Arc::clone(&datasets)),
            Arc::new(FaultInjector::new()),
            Arc::new(CallLog::new(simulation.call_log_capacity)),
        );

        debug!(database = %config.database.path, "Application wired");
        Ok(Self {
            modes,
            datasets,
            identities,
            hosting,
        })
    }
}
