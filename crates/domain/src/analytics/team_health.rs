//! Review-load distribution for a repository

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::Dataset;
use crate::value_objects::IdentityId;

/// Minimum number of reviews before a concentration is meaningful
const MIN_REVIEWS_FOR_BOTTLENECK: usize = 5;
/// Busiest-reviewer share from which review load counts as a bottleneck
const BOTTLENECK_SHARE: f64 = 0.6;

/// How review work is spread across a repository's contributors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamHealth {
    pub repository: String,
    pub review_count: usize,
    pub reviewer_count: usize,
    pub busiest_reviewer: Option<IdentityId>,
    /// Share of all reviews performed by the busiest reviewer
    pub busiest_reviewer_share: f64,
}

impl TeamHealth {
    #[must_use]
    pub fn for_repository(dataset: &Dataset, repository: &str) -> Self {
        let mut per_reviewer: HashMap<&IdentityId, usize> = HashMap::new();
        for review in dataset
            .pull_requests(repository)
            .iter()
            .flat_map(|pr| pr.reviews.iter())
        {
            *per_reviewer.entry(&review.reviewer).or_default() += 1;
        }

        let review_count: usize = per_reviewer.values().sum();
        let busiest = per_reviewer
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(id, count)| ((*id).clone(), *count));

        let busiest_reviewer_share = match (&busiest, review_count) {
            (Some((_, count)), total) if total > 0 => *count as f64 / total as f64,
            _ => 0.0,
        };

        Self {
            repository: repository.to_string(),
            review_count,
            reviewer_count: per_reviewer.len(),
            busiest_reviewer: busiest.map(|(id, _)| id),
            busiest_reviewer_share,
        }
    }

    /// Whether review load is concentrated on a single reviewer
    #[must_use]
    pub fn is_bottleneck(&self) -> bool {
        self.review_count >= MIN_REVIEWS_FOR_BOTTLENECK
            && self.busiest_reviewer_share >= BOTTLENECK_SHARE
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::entities::{GenerationParameters, PullRequest, PullRequestState, Review, ReviewState};
    use crate::value_objects::DatasetName;

    const REPO: &str = "acme/api";

    fn pull_request(number: u64, reviewers: &[&str]) -> PullRequest {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();
        PullRequest {
            number,
            repository: REPO.to_string(),
            author: IdentityId::from("1001"),
            title: format!("Change {number}"),
            state: PullRequestState::Open,
            created_at: at,
            merged_at: None,
            closed_at: None,
            reviews: reviewers
                .iter()
                .map(|&reviewer| Review {
                    reviewer: IdentityId::from(reviewer),
                    state: ReviewState::Approved,
                    submitted_at: at,
                })
                .collect(),
        }
    }

    fn dataset(pull_requests: Vec<PullRequest>) -> Dataset {
        Dataset {
            name: DatasetName::new("health").unwrap(),
            parameters: GenerationParameters::default(),
            generated_at: Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap(),
            identities: Vec::new(),
            repositories: Vec::new(),
            commits_by_repo: BTreeMap::new(),
            pull_requests_by_repo: BTreeMap::from([(REPO.to_string(), pull_requests)]),
            issues_by_repo: BTreeMap::new(),
        }
    }

    #[test]
    fn single_gatekeeper_is_a_bottleneck() {
        let prs = (1..=6).map(|n| pull_request(n, &["1002"])).collect();
        let health = TeamHealth::for_repository(&dataset(prs), REPO);

        assert_eq!(health.review_count, 6);
        assert_eq!(health.reviewer_count, 1);
        assert_eq!(health.busiest_reviewer, Some(IdentityId::from("1002")));
        assert!((health.busiest_reviewer_share - 1.0).abs() < f64::EPSILON);
        assert!(health.is_bottleneck());
    }

    #[test]
    fn spread_reviews_are_healthy() {
        let prs = vec![
            pull_request(1, &["1002", "1003"]),
            pull_request(2, &["1003", "1004"]),
            pull_request(3, &["1004", "1002"]),
        ];
        let health = TeamHealth::for_repository(&dataset(prs), REPO);

        assert_eq!(health.review_count, 6);
        assert_eq!(health.reviewer_count, 3);
        assert!(!health.is_bottleneck());
    }

    #[test]
    fn too_few_reviews_never_count() {
        let prs = vec![pull_request(1, &["1002"]), pull_request(2, &["1002"])];
        assert!(!TeamHealth::for_repository(&dataset(prs), REPO).is_bottleneck());
    }

    #[test]
    fn unknown_repository_is_empty() {
        let health = TeamHealth::for_repository(&dataset(Vec::new()), "acme/none");
        assert_eq!(health.review_count, 0);
        assert!(health.busiest_reviewer.is_none());
        assert!(health.busiest_reviewer_share.abs() < f64::EPSILON);
    }
}
