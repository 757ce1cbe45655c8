//! Property-based tests for domain value objects
//!
//! These tests use proptest to verify invariants across many random inputs.

use chrono::{DateTime, Duration, Utc};
use domain::{
    ActivityLevel, DatasetName, ErrorSimulation, FaultKind, GenerationParameters, TimeWindow,
};
use proptest::prelude::*;

// ============================================================================
// DatasetName Property Tests
// ============================================================================

mod dataset_name_tests {
    use super::*;

    proptest! {
        #[test]
        fn valid_names_accepted(name in "[A-Za-z0-9._-]{1,64}") {
            let parsed = DatasetName::new(name.clone());
            prop_assert!(parsed.is_ok());
            let parsed = parsed.unwrap();
            prop_assert_eq!(parsed.as_str(), name.as_str());
        }

        #[test]
        fn surrounding_whitespace_is_trimmed(name in "[a-z0-9]{1,32}") {
            let parsed = DatasetName::new(format!("  {name}\t")).unwrap();
            prop_assert_eq!(parsed.as_str(), name.as_str());
        }

        #[test]
        fn overlong_names_rejected(name in "[a-z]{65,100}") {
            prop_assert!(DatasetName::new(name).is_err());
        }

        #[test]
        fn unexpected_characters_rejected(
            prefix in "[a-z]{0,10}",
            bad in "[/ :*?@#]",
            suffix in "[a-z]{1,10}"
        ) {
            let candidate = format!("{prefix}{bad}{suffix}");
            prop_assert!(DatasetName::new(candidate).is_err());
        }

        #[test]
        fn serde_rejects_what_new_rejects(name in "[a-z]{1,8}/[a-z]{1,8}") {
            let json = serde_json::to_string(&name).unwrap();
            prop_assert!(serde_json::from_str::<DatasetName>(&json).is_err());
        }
    }

    #[test]
    fn blank_name_rejected() {
        assert!(DatasetName::new("   ").is_err());
    }
}

// ============================================================================
// ErrorSimulation Property Tests
// ============================================================================

mod error_simulation_tests {
    use super::*;

    proptest! {
        #[test]
        fn rates_within_unit_interval_valid(rate in 0.0f64..=1.0f64) {
            prop_assert!(ErrorSimulation::with_rate(rate).validate().is_ok());
        }

        #[test]
        fn rates_outside_unit_interval_invalid(
            rate in prop_oneof![(-10.0f64..-0.001f64), (1.001f64..10.0f64)]
        ) {
            prop_assert!(ErrorSimulation::with_rate(rate).validate().is_err());
        }
    }

    #[test]
    fn non_finite_rates_invalid() {
        assert!(ErrorSimulation::with_rate(f64::NAN).validate().is_err());
        assert!(ErrorSimulation::with_rate(f64::INFINITY).validate().is_err());
    }
}

// ============================================================================
// TimeWindow Property Tests
// ============================================================================

mod time_window_tests {
    use super::*;

    fn instant(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    proptest! {
        #[test]
        fn last_days_contains_both_endpoints(
            until in 1_000_000_000i64..2_000_000_000i64,
            days in 0u32..=730
        ) {
            let until = instant(until);
            let window = TimeWindow::last_days(until, days);
            prop_assert!(window.contains(until));
            prop_assert!(window.contains(window.since()));
            prop_assert_eq!(window.until() - window.since(), Duration::days(i64::from(days)));
        }

        #[test]
        fn instants_after_until_excluded(
            until in 1_000_000_000i64..2_000_000_000i64,
            days in 0u32..=730,
            later in 1i64..1_000_000
        ) {
            let until = instant(until);
            let window = TimeWindow::last_days(until, days);
            prop_assert!(!window.contains(until + Duration::seconds(later)));
        }

        #[test]
        fn reversed_bounds_rejected(
            since in 1_000_000_000i64..2_000_000_000i64,
            gap in 1i64..1_000_000
        ) {
            prop_assert!(TimeWindow::new(instant(since + gap), instant(since)).is_err());
        }
    }
}

// ============================================================================
// FaultKind Property Tests
// ============================================================================

mod fault_kind_tests {
    use super::*;

    proptest! {
        #[test]
        fn parsing_ignores_case_and_dashes(
            index in 0usize..FaultKind::ALL.len(),
            upper in any::<bool>(),
            dashed in any::<bool>()
        ) {
            let kind = FaultKind::ALL[index];
            let mut text = kind.as_str().to_string();
            if upper {
                text = text.to_uppercase();
            }
            if dashed {
                text = text.replace('_', "-");
            }
            prop_assert_eq!(text.parse::<FaultKind>().unwrap(), kind);
        }
    }
}

// ============================================================================
// GenerationParameters Property Tests
// ============================================================================

mod generation_parameters_tests {
    use super::*;

    fn parameters(repositories: u32, users: u32, days: u32) -> GenerationParameters {
        GenerationParameters {
            repository_count: repositories,
            users_per_repository: users,
            time_range_days: days,
            activity_level: ActivityLevel::Medium,
            burnout_patterns_enabled: false,
            collaboration_patterns_enabled: false,
        }
    }

    proptest! {
        #[test]
        fn values_within_caps_pass(
            repositories in 1u32..=200,
            users in 1u32..=100,
            days in 1u32..=730
        ) {
            prop_assert!(parameters(repositories, users, days).check().is_ok());
        }

        #[test]
        fn values_beyond_caps_fail(
            repositories in 201u32..10_000,
            users in 1u32..=100,
            days in 1u32..=730
        ) {
            prop_assert!(parameters(repositories, users, days).check().is_err());
            prop_assert!(parameters(1, users + 100, days).check().is_err());
            prop_assert!(parameters(1, users, days + 730).check().is_err());
        }
    }

    #[test]
    fn zero_counts_fail() {
        assert!(parameters(0, 1, 1).check().is_err());
        assert!(parameters(1, 0, 1).check().is_err());
        assert!(parameters(1, 1, 0).check().is_err());
    }
}
