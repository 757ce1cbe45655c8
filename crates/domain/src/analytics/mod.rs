//! Burnout and team-health heuristics over dataset activity
//!
//! These are the signals the dashboard scores; the synthetic generator's
//! patterning is shaped so that they can be detected.

mod burnout;
mod team_health;

use serde::{Deserialize, Serialize};

pub use burnout::BurnoutSignals;
pub use team_health::TeamHealth;

use crate::entities::{Dataset, DatasetCounts};
use crate::value_objects::{DatasetName, IdentityId};

/// Score at or above which an identity counts as high risk
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;

/// Aggregate view of a dataset for listings and dashboards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub name: DatasetName,
    pub counts: DatasetCounts,
    /// Mean burnout score over identities with at least one commit
    pub mean_burnout_score: f64,
    pub high_risk_identities: Vec<IdentityId>,
    /// Repositories whose review load is concentrated on one reviewer
    pub bottleneck_repositories: Vec<String>,
}

impl DatasetSummary {
    #[must_use]
    pub fn for_dataset(dataset: &Dataset) -> Self {
        let scored: Vec<(IdentityId, f64)> = dataset
            .identities
            .iter()
            .map(|identity| BurnoutSignals::for_identity(dataset, &identity.id))
            .filter(|signals| signals.commit_count > 0)
            .map(|signals| {
                let score = signals.risk_score();
                (signals.identity, score)
            })
            .collect();

        let mean_burnout_score = if scored.is_empty() {
            0.0
        } else {
            scored.iter().map(|(_, score)| score).sum::<f64>() / scored.len() as f64
        };

        let high_risk_identities = scored
            .into_iter()
            .filter(|(_, score)| *score >= HIGH_RISK_THRESHOLD)
            .map(|(id, _)| id)
            .collect();

        let bottleneck_repositories = dataset
            .repositories
            .iter()
            .map(|repo| TeamHealth::for_repository(dataset, &repo.full_name))
            .filter(TeamHealth::is_bottleneck)
            .map(|health| health.repository)
            .collect();

        Self {
            name: dataset.name.clone(),
            counts: dataset.counts(),
            mean_burnout_score,
            high_risk_identities,
            bottleneck_repositories,
        }
    }
}
