//! Fault injector for synthetic modes.
//!
//! Every draw is independent: there is no cooldown, no fault budget and no
//! memory of earlier outcomes.

use domain::{FaultInjectionConfig, FaultKind};
use rand::Rng;
use tracing::debug;

use super::{ChaosContext, ChaosStats};

/// Stateless, thread-safe fault injector
#[derive(Debug, Default)]
pub struct FaultInjector {
    context: ChaosContext,
}

impl FaultInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the current call should fail
    ///
    /// Never true when injection is disabled. A probability of `0.0` never
    /// fails and `1.0` always fails.
    pub fn should_fail(&self, config: &FaultInjectionConfig) -> bool {
        if !config.enabled || config.probability <= 0.0 {
            return false;
        }

        if config.probability >= 1.0 {
            return true;
        }

        rand::rng().random::<f64>() < config.probability
    }

    /// Pick a fault kind uniformly from the allowed set (all kinds when empty)
    pub fn pick_fault_kind(&self, config: &FaultInjectionConfig) -> FaultKind {
        let kinds = config.eligible_kinds();
        if kinds.len() == 1 {
            return kinds[0];
        }
        let index = rand::rng().random_range(0..kinds.len());
        kinds[index]
    }

    /// Check a call and pick its fault kind if it should fail
    ///
    /// Also records the outcome in the observational counters.
    pub fn draw(&self, config: &FaultInjectionConfig) -> Option<FaultKind> {
        self.context.record_call();
        if !self.should_fail(config) {
            return None;
        }

        let kind = self.pick_fault_kind(config);
        self.context.record_injection(kind);
        debug!(kind = %kind, probability = config.probability, "Injecting simulated fault");
        Some(kind)
    }

    /// Get current injection statistics
    pub fn stats(&self) -> ChaosStats {
        self.context.stats()
    }
}
