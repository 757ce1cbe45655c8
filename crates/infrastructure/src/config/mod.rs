//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite database settings
//! - `simulation`: mode defaults, generation parameters, call log

mod database;
mod simulation;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::telemetry::LoggingConfig;

pub use database::DatabaseConfig;
pub use simulation::SimulationConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Default configuration file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_FILE: &str = "teampulse";

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `teampulse.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from the given file (if present) and the environment
    ///
    /// Environment variables use the `TEAMPULSE_` prefix and `__` between
    /// nested keys, e.g. `TEAMPULSE_SIMULATION__MODE=demo`.
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("database.path", "teampulse.db")?
            .set_default("simulation.mode", "live")?
            .set_default("logging.filter", "info")?
            // Load from file if exists
            .add_source(config::File::with_name(file).required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("TEAMPULSE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %config.environment,
            mode = %config.simulation.mode,
            database = %config.database.path,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Check values that serde alone cannot
    ///
    /// Production deployments must cold-start without simulated faults;
    /// error simulation can still be enabled by an explicit mode switch.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        self.simulation
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        if self.environment.is_production() && self.simulation.error_simulation.enabled {
            return Err(config::ConfigError::Message(
                "simulation.error_simulation must be disabled at startup in production".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use domain::{ActivityLevel, ApplicationMode};

    use super::*;

    #[test]
    fn environment_default_is_development() {
        assert_eq!(Environment::default(), Environment::Development);
    }

    #[test]
    fn environment_from_str() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("DEVELOPMENT".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn defaults_start_in_live_mode() {
        let config = AppConfig::default();
        assert_eq!(config.simulation.mode, ApplicationMode::Live);
        assert_eq!(config.database.path, "teampulse.db");
        assert_eq!(config.simulation.call_log_capacity, 256);
        assert!(config.simulation.generator_seed.is_none());
    }

    #[test]
    fn mode_defaults_fill_dataset_for_synthetic_modes() {
        let simulation = SimulationConfig {
            mode: ApplicationMode::Demo,
            ..Default::default()
        };
        let defaults = simulation.mode_defaults().unwrap();
        assert_eq!(defaults.dataset_id.unwrap().as_str(), "default");
    }

    #[test]
    fn invalid_rate_is_rejected() {
        let mut simulation = SimulationConfig::default();
        simulation.error_simulation.rate = 1.5;
        assert!(simulation.validate().is_err());
    }

    #[test]
    fn load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
environment = "production"

[database]
path = "/tmp/pulse.db"

[simulation]
mode = "mock"
dataset_id = "team-a"
generator_seed = 42

[simulation.generation]
repository_count = 3
users_per_repository = 2
time_range_days = 30
activity_level = "high"

[simulation.error_simulation]
enabled = false
rate = 0.25
"#
        )
        .unwrap();

        let stem = path.with_extension("");
        let config = AppConfig::load_from(stem.to_str().unwrap()).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.database.path, "/tmp/pulse.db");
        assert_eq!(config.simulation.mode, ApplicationMode::Mock);
        assert_eq!(config.simulation.generator_seed, Some(42));
        assert_eq!(config.simulation.generation.repository_count, 3);
        assert_eq!(config.simulation.generation.activity_level, ActivityLevel::High);
        assert!((config.simulation.error_simulation.rate - 0.25).abs() < f64::EPSILON);

        let defaults = config.simulation.mode_defaults().unwrap();
        assert_eq!(defaults.dataset_id.unwrap().as_str(), "team-a");
    }

    #[test]
    fn production_refuses_cold_start_faults() {
        let mut config = AppConfig::default();
        config.simulation.mode = ApplicationMode::Demo;
        config.simulation.error_simulation = domain::ErrorSimulation::with_rate(0.2);
        assert!(config.validate().is_ok());

        config.environment = Environment::Production;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("production"));

        config.simulation.error_simulation = domain::ErrorSimulation::disabled();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_applies_environment_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prod.toml");
        std::fs::write(
            &path,
            "environment = \"production\"\n\n[simulation.error_simulation]\nenabled = true\nrate = 0.5\n",
        )
        .unwrap();

        let stem = path.with_extension("");
        assert!(AppConfig::load_from(stem.to_str().unwrap()).is_err());
    }

    #[test]
    fn load_rejects_invalid_generation_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(
            &path,
            "[simulation.generation]\nrepository_count = 0\nusers_per_repository = 1\ntime_range_days = 1\n",
        )
        .unwrap();

        let stem = path.with_extension("");
        assert!(AppConfig::load_from(stem.to_str().unwrap()).is_err());
    }
}
