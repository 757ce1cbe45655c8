//! Mode configuration entity - the single active application mode record

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{ApplicationMode, DatasetName, FaultKind};

/// Error simulation settings carried by the mode record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ErrorSimulation {
    /// Whether simulated upstream faults are injected
    #[serde(default)]
    pub enabled: bool,
    /// Probability (0.0-1.0) that a synthetic call fails
    #[serde(default)]
    pub rate: f64,
    /// Fault kinds to choose from; empty means every kind
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub allowed_kinds: BTreeSet<FaultKind>,
}

impl ErrorSimulation {
    /// Error simulation turned off
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Error simulation failing calls with the given probability
    #[must_use]
    pub fn with_rate(rate: f64) -> Self {
        Self {
            enabled: true,
            rate,
            allowed_kinds: BTreeSet::new(),
        }
    }

    /// Restrict injected faults to the given kinds
    #[must_use]
    pub fn with_kinds(mut self, kinds: impl IntoIterator<Item = FaultKind>) -> Self {
        self.allowed_kinds = kinds.into_iter().collect();
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.rate.is_finite() || !(0.0..=1.0).contains(&self.rate) {
            return Err(DomainError::validation(format!(
                "Error simulation rate must be within 0.0..=1.0, got {}",
                self.rate
            )));
        }
        Ok(())
    }
}

/// Fault injection settings as consumed by the fault injector
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FaultInjectionConfig {
    pub enabled: bool,
    pub probability: f64,
    pub allowed_kinds: BTreeSet<FaultKind>,
}

impl FaultInjectionConfig {
    /// Fault kinds eligible for selection (the full set when unrestricted)
    #[must_use]
    pub fn eligible_kinds(&self) -> Vec<FaultKind> {
        if self.allowed_kinds.is_empty() {
            FaultKind::ALL.to_vec()
        } else {
            self.allowed_kinds.iter().copied().collect()
        }
    }
}

impl From<&ErrorSimulation> for FaultInjectionConfig {
    fn from(simulation: &ErrorSimulation) -> Self {
        Self {
            enabled: simulation.enabled,
            probability: simulation.rate,
            allowed_kinds: simulation.allowed_kinds.clone(),
        }
    }
}

/// Options accepted by a mode switch
///
/// Anything left unset takes its default in the replacement record; nothing
/// is carried over from the previous configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeSwitchOptions {
    #[serde(default)]
    pub dataset_id: Option<String>,
    #[serde(default)]
    pub error_simulation: Option<ErrorSimulation>,
    #[serde(default)]
    pub enabled_features: Option<BTreeSet<String>>,
}

impl ModeSwitchOptions {
    #[must_use]
    pub fn with_dataset(mut self, dataset_id: impl Into<String>) -> Self {
        self.dataset_id = Some(dataset_id.into());
        self
    }

    #[must_use]
    pub fn with_error_simulation(mut self, simulation: ErrorSimulation) -> Self {
        self.error_simulation = Some(simulation);
        self
    }

    #[must_use]
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled_features = Some(features.into_iter().map(Into::into).collect());
        self
    }
}

/// The process-wide application mode record
///
/// Invariant: `dataset_id` is `Some` exactly when `mode` is synthetic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeConfiguration {
    pub mode: ApplicationMode,
    #[serde(default)]
    pub dataset_id: Option<DatasetName>,
    #[serde(default)]
    pub error_simulation: ErrorSimulation,
    #[serde(default)]
    pub enabled_features: BTreeSet<String>,
}

impl ModeConfiguration {
    /// Build a complete replacement record for a mode switch
    ///
    /// Synthetic modes fall back to the `"default"` dataset. Live mode never
    /// carries a dataset.
    pub fn build(mode: ApplicationMode, options: ModeSwitchOptions) -> Result<Self, DomainError> {
        let error_simulation = options.error_simulation.unwrap_or_default();
        error_simulation.validate()?;

        let enabled_features = options.enabled_features.unwrap_or_default();
        if enabled_features.iter().any(|f| f.trim().is_empty()) {
            return Err(DomainError::validation("Feature identifiers must not be blank"));
        }

        let dataset_id = if mode.is_synthetic() {
            Some(match options.dataset_id {
                Some(id) => DatasetName::new(id)?,
                None => DatasetName::default_name(),
            })
        } else {
            None
        };

        Ok(Self {
            mode,
            dataset_id,
            error_simulation,
            enabled_features,
        })
    }

    /// Check the record invariants (used when loading persisted records)
    pub fn validate(&self) -> Result<(), DomainError> {
        self.error_simulation.validate()?;
        match (self.mode.is_synthetic(), &self.dataset_id) {
            (true, None) => Err(DomainError::validation(format!(
                "Mode {} requires a dataset id",
                self.mode
            ))),
            (false, Some(id)) => Err(DomainError::validation(format!(
                "Live mode must not reference dataset {id}"
            ))),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_feature_enabled(&self, feature: &str) -> bool {
        self.enabled_features.contains(feature)
    }

    #[must_use]
    pub fn fault_injection(&self) -> FaultInjectionConfig {
        FaultInjectionConfig::from(&self.error_simulation)
    }
}
