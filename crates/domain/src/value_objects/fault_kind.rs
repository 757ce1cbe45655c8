//! Kinds of simulated upstream faults

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Upstream failure kinds the fault injector can simulate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    RateLimitExceeded,
    NetworkError,
    AuthenticationError,
    NotFound,
    ServerError,
}

impl FaultKind {
    /// Every fault kind, in declaration order
    pub const ALL: [Self; 5] = [
        Self::RateLimitExceeded,
        Self::NetworkError,
        Self::AuthenticationError,
        Self::NotFound,
        Self::ServerError,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::NetworkError => "network_error",
            Self::AuthenticationError => "authentication_error",
            Self::NotFound => "not_found",
            Self::ServerError => "server_error",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FaultKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| DomainError::validation(format!("Unknown fault kind: {s}")))
    }
}
