//! Generation parameters for synthetic datasets

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;
use crate::value_objects::ActivityLevel;

/// Upper bound on repositories per dataset
pub const MAX_REPOSITORY_COUNT: u32 = 200;
/// Upper bound on contributors per repository
pub const MAX_USERS_PER_REPOSITORY: u32 = 100;
/// Upper bound on the generated history length in days
pub const MAX_TIME_RANGE_DAYS: u32 = 730;

/// Parameters controlling the size and shape of a generated dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GenerationParameters {
    #[validate(range(min = 1, max = MAX_REPOSITORY_COUNT))]
    pub repository_count: u32,
    #[validate(range(min = 1, max = MAX_USERS_PER_REPOSITORY))]
    pub users_per_repository: u32,
    #[validate(range(min = 1, max = MAX_TIME_RANGE_DAYS))]
    pub time_range_days: u32,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub burnout_patterns_enabled: bool,
    #[serde(default)]
    pub collaboration_patterns_enabled: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            repository_count: 5,
            users_per_repository: 4,
            time_range_days: 90,
            activity_level: ActivityLevel::Medium,
            burnout_patterns_enabled: true,
            collaboration_patterns_enabled: true,
        }
    }
}

impl GenerationParameters {
    /// Validate every field, reporting all offending fields at once
    pub fn check(&self) -> Result<(), DomainError> {
        self.validate().map_err(|e| {
            let mut fields: Vec<String> = e.field_errors().keys().map(ToString::to_string).collect();
            fields.sort_unstable();
            DomainError::validation(format!(
                "Invalid generation parameters ({}): counts must be positive and at most \
                 {MAX_REPOSITORY_COUNT} repositories, {MAX_USERS_PER_REPOSITORY} users per \
                 repository, {MAX_TIME_RANGE_DAYS} days",
                fields.join(", ")
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GenerationParameters::default().check().is_ok());
    }

    #[test]
    fn zero_counts_are_rejected() {
        let base = GenerationParameters::default();
        let cases = [
            GenerationParameters {
                repository_count: 0,
                ..base.clone()
            },
            GenerationParameters {
                users_per_repository: 0,
                ..base.clone()
            },
            GenerationParameters {
                time_range_days: 0,
                ..base
            },
        ];
        for params in cases {
            let err = params.check().unwrap_err();
            assert!(matches!(err, DomainError::ValidationError(_)));
        }
    }

    #[test]
    fn error_names_offending_fields() {
        let params = GenerationParameters {
            repository_count: 0,
            time_range_days: 0,
            ..Default::default()
        };
        let message = params.check().unwrap_err().to_string();
        assert!(message.contains("repository_count"));
        assert!(message.contains("time_range_days"));
        assert!(!message.contains("users_per_repository"));
    }

    #[test]
    fn oversized_counts_are_rejected() {
        let params = GenerationParameters {
            repository_count: MAX_REPOSITORY_COUNT + 1,
            ..Default::default()
        };
        assert!(params.check().is_err());
    }

    #[test]
    fn caps_are_inclusive() {
        let at_caps = GenerationParameters {
            repository_count: MAX_REPOSITORY_COUNT,
            users_per_repository: MAX_USERS_PER_REPOSITORY,
            time_range_days: MAX_TIME_RANGE_DAYS,
            ..Default::default()
        };
        assert!(at_caps.check().is_ok());

        let over = [
            GenerationParameters {
                users_per_repository: MAX_USERS_PER_REPOSITORY + 1,
                ..at_caps.clone()
            },
            GenerationParameters {
                time_range_days: MAX_TIME_RANGE_DAYS + 1,
                ..at_caps
            },
        ];
        for params in over {
            assert!(params.check().is_err());
        }
    }
}
