//! Activity level value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Coarse activity intensity for synthetic contributors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Occasional contributor
    Low,
    /// Steady contributor
    #[default]
    Medium,
    /// Very active contributor
    High,
}

impl ActivityLevel {
    /// Mean number of commits per contributor per repository per day
    #[must_use]
    pub const fn commits_per_day(&self) -> f64 {
        match self {
            Self::Low => 0.4,
            Self::Medium => 1.2,
            Self::High => 2.8,
        }
    }

    /// Mean number of pull requests opened per contributor per repository per day
    #[must_use]
    pub const fn pull_requests_per_day(&self) -> f64 {
        match self {
            Self::Low => 0.05,
            Self::Medium => 0.15,
            Self::High => 0.35,
        }
    }

    /// Mean number of issues opened per contributor per repository per day
    #[must_use]
    pub const fn issues_per_day(&self) -> f64 {
        match self {
            Self::Low => 0.03,
            Self::Medium => 0.08,
            Self::High => 0.2,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DomainError::validation(format!(
                "Invalid activity level: {other}. Use 'low', 'medium' or 'high'"
            ))),
        }
    }
}
