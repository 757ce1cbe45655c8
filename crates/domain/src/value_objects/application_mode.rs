//! Application mode value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Operational switch between real upstream data and synthetic substitutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationMode {
    /// Talk to the real hosting API and OAuth provider
    #[default]
    Live,
    /// Serve synthetic data for development and tests
    Mock,
    /// Serve synthetic data for product demos
    Demo,
}

impl ApplicationMode {
    /// Whether requests are served from a synthetic dataset
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        !matches!(self, Self::Live)
    }

    /// Lowercase identifier as persisted and shown in the CLI
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Mock => "mock",
            Self::Demo => "demo",
        }
    }
}

impl fmt::Display for ApplicationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "mock" => Ok(Self::Mock),
            "demo" => Ok(Self::Demo),
            other => Err(DomainError::validation(format!(
                "Invalid application mode: {other}. Use 'live', 'mock' or 'demo'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_live() {
        assert_eq!(ApplicationMode::default(), ApplicationMode::Live);
    }

    #[test]
    fn only_live_is_not_synthetic() {
        assert!(!ApplicationMode::Live.is_synthetic());
        assert!(ApplicationMode::Mock.is_synthetic());
        assert!(ApplicationMode::Demo.is_synthetic());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("MOCK".parse::<ApplicationMode>().unwrap(), ApplicationMode::Mock);
        assert_eq!(" demo ".parse::<ApplicationMode>().unwrap(), ApplicationMode::Demo);
        assert!("staging".parse::<ApplicationMode>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationMode::Demo).unwrap();
        assert_eq!(json, "\"demo\"");
    }
}
