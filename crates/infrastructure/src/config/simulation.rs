//! Synthetic environment configuration.

use std::collections::BTreeSet;

use domain::{
    ApplicationMode, DomainError, ErrorSimulation, GenerationParameters, ModeConfiguration,
    ModeSwitchOptions,
};
use serde::{Deserialize, Serialize};

/// Settings for the mock/demo environment
///
/// `mode`, `dataset_id`, `error_simulation` and `enabled_features` only seed
/// the mode record on a cold start. Once a switch has been persisted, the
/// persisted record wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub mode: ApplicationMode,

    #[serde(default)]
    pub dataset_id: Option<String>,

    #[serde(default)]
    pub error_simulation: ErrorSimulation,

    #[serde(default)]
    pub enabled_features: BTreeSet<String>,

    /// Parameters for datasets created on first access
    #[serde(default)]
    pub generation: GenerationParameters,

    /// Fixed RNG seed for reproducible datasets
    #[serde(default)]
    pub generator_seed: Option<u64>,

    /// Number of intercepted calls kept for inspection
    #[serde(default = "default_call_log_capacity")]
    pub call_log_capacity: usize,
}

const fn default_call_log_capacity() -> usize {
    256
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: ApplicationMode::Live,
            dataset_id: None,
            error_simulation: ErrorSimulation::disabled(),
            enabled_features: BTreeSet::new(),
            generation: GenerationParameters::default(),
            generator_seed: None,
            call_log_capacity: default_call_log_capacity(),
        }
    }
}

impl SimulationConfig {
    /// The mode record used when nothing has been persisted yet
    pub fn mode_defaults(&self) -> Result<ModeConfiguration, DomainError> {
        let mut options = ModeSwitchOptions::default()
            .with_error_simulation(self.error_simulation.clone())
            .with_features(self.enabled_features.iter().cloned());
        if let Some(dataset_id) = &self.dataset_id {
            options = options.with_dataset(dataset_id.clone());
        }
        ModeConfiguration::build(self.mode, options)
    }

    /// Check values that serde alone cannot
    pub fn validate(&self) -> Result<(), DomainError> {
        self.generation.check()?;
        self.mode_defaults().map(|_| ())
    }
}
