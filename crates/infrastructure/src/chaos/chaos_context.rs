//! Chaos context for tracking fault injection statistics.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use domain::FaultKind;
use serde::{Deserialize, Serialize};

/// Snapshot of fault injection statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChaosStats {
    /// Total number of calls checked
    pub total_calls: u64,
    /// Number of faults injected
    pub faults_injected: u64,
    /// Injected faults by kind
    pub by_kind: BTreeMap<FaultKind, u64>,
}

impl ChaosStats {
    /// Calculate the actual fault rate
    pub fn actual_fault_rate(&self) -> f64 {
        if self.total_calls == 0 {
            0.0
        } else {
            self.faults_injected as f64 / self.total_calls as f64
        }
    }
}

/// Counters updated by the fault injector
///
/// Purely observational: nothing here feeds back into fault draws.
#[derive(Debug, Default)]
pub struct ChaosContext {
    total_calls: AtomicU64,
    faults_injected: AtomicU64,
    by_kind: [AtomicU64; FaultKind::ALL.len()],
}

impl ChaosContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call being checked
    pub fn record_call(&self) {
        self.total_calls.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fault being injected
    pub fn record_injection(&self, kind: FaultKind) {
        self.faults_injected.fetch_add(1, Ordering::Relaxed);
        self.by_kind[slot(kind)].fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics
    pub fn stats(&self) -> ChaosStats {
        let by_kind = FaultKind::ALL
            .iter()
            .filter_map(|&kind| {
                let count = self.by_kind[slot(kind)].load(Ordering::Relaxed);
                (count > 0).then_some((kind, count))
            })
            .collect();

        ChaosStats {
            total_calls: self.total_calls.load(Ordering::Relaxed),
            faults_injected: self.faults_injected.load(Ordering::Relaxed),
            by_kind,
        }
    }
}

fn slot(kind: FaultKind) -> usize {
    FaultKind::ALL
        .iter()
        .position(|&k| k == kind)
        .unwrap_or_default()
}
