//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: SQLite persistence,
//! the synthetic data generator, the fault injector and the mode-aware
//! hosting client.

pub mod adapters;
pub mod chaos;
pub mod config;
pub mod persistence;
pub mod synthetic;
pub mod telemetry;

pub use adapters::*;
pub use chaos::{ChaosContext, ChaosStats, FaultInjector};
pub use config::{AppConfig, DatabaseConfig, Environment, SimulationConfig};
pub use persistence::{
    ConnectionPool, SqliteDatasetStore, SqliteModeStore, SqliteSessionStore, create_pool,
};
pub use synthetic::SyntheticDataGenerator;
pub use telemetry::{LoggingConfig, TelemetryError, init_tracing};
