//! Dataset entity - a named synthetic entity graph
//!
//! A dataset is built in one piece by the generator (or an import) and is
//! replaced wholesale, never edited in place.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Commit, GenerationParameters, Issue, IssueState, PullRequest, PullRequestState};
use super::{Repository, SyntheticIdentity};
use crate::errors::DomainError;
use crate::value_objects::{DatasetName, IdentityId, TimeWindow};

/// Entity counts of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetCounts {
    pub identities: usize,
    pub repositories: usize,
    pub commits: usize,
    pub pull_requests: usize,
    pub issues: usize,
}

/// A named, self-consistent synthetic entity graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: DatasetName,
    pub parameters: GenerationParameters,
    /// Anchor of the generation window: every timestamp lies in
    /// `[generated_at - time_range_days, generated_at]`
    pub generated_at: DateTime<Utc>,
    pub identities: Vec<SyntheticIdentity>,
    pub repositories: Vec<Repository>,
    /// Keyed by repository full name
    pub commits_by_repo: BTreeMap<String, Vec<Commit>>,
    pub pull_requests_by_repo: BTreeMap<String, Vec<PullRequest>>,
    pub issues_by_repo: BTreeMap<String, Vec<Issue>>,
}

impl Dataset {
    /// The window all activity of this dataset falls into
    #[must_use]
    pub fn window(&self) -> TimeWindow {
        TimeWindow::last_days(self.generated_at, self.parameters.time_range_days)
    }

    #[must_use]
    pub fn identity(&self, id: &IdentityId) -> Option<&SyntheticIdentity> {
        self.identities.iter().find(|i| &i.id == id)
    }

    #[must_use]
    pub fn repository(&self, full_name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.full_name == full_name)
    }

    /// Repositories the identity contributes to, in dataset order
    #[must_use]
    pub fn repositories_for(&self, identity: &IdentityId) -> Vec<&Repository> {
        self.repositories
            .iter()
            .filter(|r| r.has_contributor(identity))
            .collect()
    }

    #[must_use]
    pub fn commits(&self, repository: &str) -> &[Commit] {
        self.commits_by_repo
            .get(repository)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn pull_requests(&self, repository: &str) -> &[PullRequest] {
        self.pull_requests_by_repo
            .get(repository)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn issues(&self, repository: &str) -> &[Issue] {
        self.issues_by_repo
            .get(repository)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every commit in the dataset regardless of repository
    pub fn all_commits(&self) -> impl Iterator<Item = &Commit> {
        self.commits_by_repo.values().flatten()
    }

    /// Every pull request in the dataset regardless of repository
    pub fn all_pull_requests(&self) -> impl Iterator<Item = &PullRequest> {
        self.pull_requests_by_repo.values().flatten()
    }

    /// Every issue in the dataset regardless of repository
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.issues_by_repo.values().flatten()
    }

    #[must_use]
    pub fn counts(&self) -> DatasetCounts {
        DatasetCounts {
            identities: self.identities.len(),
            repositories: self.repositories.len(),
            commits: self.all_commits().count(),
            pull_requests: self.all_pull_requests().count(),
            issues: self.all_issues().count(),
        }
    }

    /// The same graph under another name
    #[must_use]
    pub fn renamed(mut self, name: DatasetName) -> Self {
        self.name = name;
        self
    }

    /// Check referential integrity and timestamp bounds of the whole graph
    ///
    /// Every commit, pull request and issue must reference a repository and
    /// identities that exist in this dataset, every timestamp must lie inside
    /// [`Self::window`], and merged pull requests must be merged after they
    /// were opened.
    pub fn validate_integrity(&self) -> Result<(), DomainError> {
        self.parameters.check()?;
        let window = self.window();

        let identities: HashSet<&IdentityId> = self.identities.iter().map(|i| &i.id).collect();
        if identities.len() != self.identities.len() {
            return Err(DomainError::integrity("duplicate identity ids"));
        }

        let mut repositories = HashSet::new();
        for repo in &self.repositories {
            if repo.full_name != format!("{}/{}", repo.owner, repo.name) {
                return Err(DomainError::integrity(format!(
                    "repository {} has inconsistent full name",
                    repo.full_name
                )));
            }
            if !repositories.insert(repo.full_name.as_str()) {
                return Err(DomainError::integrity(format!(
                    "duplicate repository {}",
                    repo.full_name
                )));
            }
            if let Some(missing) = repo.contributors.iter().find(|c| !identities.contains(c)) {
                return Err(DomainError::integrity(format!(
                    "repository {} lists unknown contributor {missing}",
                    repo.full_name
                )));
            }
        }

        let known_identity = |id: &IdentityId, what: &str| {
            if identities.contains(id) {
                Ok(())
            } else {
                Err(DomainError::integrity(format!("{what} references unknown identity {id}")))
            }
        };
        let in_window = |instant: DateTime<Utc>, what: &str| {
            if window.contains(instant) {
                Ok(())
            } else {
                Err(DomainError::integrity(format!(
                    "{what} timestamp {instant} outside [{}, {}]",
                    window.since(),
                    window.until()
                )))
            }
        };
        let known_repository = |key: &str, declared: &str, what: &str| {
            if !repositories.contains(key) {
                return Err(DomainError::integrity(format!(
                    "{what} grouped under unknown repository {key}"
                )));
            }
            if key != declared {
                return Err(DomainError::integrity(format!(
                    "{what} declares repository {declared} but is grouped under {key}"
                )));
            }
            Ok(())
        };

        for (key, commits) in &self.commits_by_repo {
            for commit in commits {
                let what = format!("commit {}", commit.sha);
                let what = what.as_str();
                known_repository(key, &commit.repository, what)?;
                known_identity(&commit.author, what)?;
                in_window(commit.authored_at, what)?;
            }
        }

        for (key, pull_requests) in &self.pull_requests_by_repo {
            for pr in pull_requests {
                let what = format!("pull request {}#{}", key, pr.number);
                let what = what.as_str();
                known_repository(key, &pr.repository, what)?;
                known_identity(&pr.author, what)?;
                in_window(pr.created_at, what)?;

                match (pr.state, pr.merged_at) {
                    (PullRequestState::Merged, Some(merged_at)) => {
                        in_window(merged_at, what)?;
                        if merged_at <= pr.created_at {
                            return Err(DomainError::integrity(format!(
                                "{what} merged before it was opened"
                            )));
                        }
                    },
                    (PullRequestState::Merged, None) => {
                        return Err(DomainError::integrity(format!("{what} merged without merge time")));
                    },
                    (_, Some(_)) => {
                        return Err(DomainError::integrity(format!("{what} has merge time but is not merged")));
                    },
                    (_, None) => {},
                }
                if let Some(closed_at) = pr.closed_at {
                    in_window(closed_at, what)?;
                    if closed_at < pr.created_at {
                        return Err(DomainError::integrity(format!("{what} closed before it was opened")));
                    }
                }
                for review in &pr.reviews {
                    known_identity(&review.reviewer, what)?;
                    in_window(review.submitted_at, what)?;
                    if review.submitted_at < pr.created_at {
                        return Err(DomainError::integrity(format!(
                            "{what} reviewed before it was opened"
                        )));
                    }
                }
            }
        }

        for (key, issues) in &self.issues_by_repo {
            for issue in issues {
                let what = format!("issue {}#{}", key, issue.number);
                let what = what.as_str();
                known_repository(key, &issue.repository, what)?;
                known_identity(&issue.author, what)?;
                if let Some(assignee) = &issue.assignee {
                    known_identity(assignee, what)?;
                }
                in_window(issue.created_at, what)?;
                match (issue.state, issue.closed_at) {
                    (IssueState::Closed, Some(closed_at)) => {
                        in_window(closed_at, what)?;
                        if closed_at < issue.created_at {
                            return Err(DomainError::integrity(format!(
                                "{what} closed before it was opened"
                            )));
                        }
                    },
                    (IssueState::Open, None) => {},
                    _ => {
                        return Err(DomainError::integrity(format!(
                            "{what} has inconsistent state and close time"
                        )));
                    },
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::entities::{Review, ReviewState, identity_catalog};

    fn small_dataset() -> Dataset {
        let now = Utc::now();
        let identities: Vec<_> = identity_catalog().into_iter().take(2).collect();
        let contributors: Vec<_> = identities.iter().map(|i| i.id.clone()).collect();
        let repo = Repository {
            id: 1,
            owner: "acme".to_string(),
            name: "api".to_string(),
            full_name: "acme/api".to_string(),
            description: None,
            language: Some("Rust".to_string()),
            default_branch: "main".to_string(),
            private: false,
            stars: 3,
            created_at: now - Duration::days(400),
            contributors: contributors.clone(),
        };
        let commit = Commit {
            sha: "abc123".to_string(),
            repository: "acme/api".to_string(),
            author: contributors[0].clone(),
            message: "Initial import".to_string(),
            authored_at: now - Duration::days(3),
            additions: 10,
            deletions: 0,
        };
        let pr = PullRequest {
            number: 1,
            repository: "acme/api".to_string(),
            author: contributors[0].clone(),
            title: "Add health check".to_string(),
            state: PullRequestState::Merged,
            created_at: now - Duration::days(2),
            merged_at: Some(now - Duration::days(1)),
            closed_at: Some(now - Duration::days(1)),
            reviews: vec![Review {
                reviewer: contributors[1].clone(),
                state: ReviewState::Approved,
                submitted_at: now - Duration::hours(30),
            }],
        };
        let issue = Issue {
            number: 2,
            repository: "acme/api".to_string(),
            author: contributors[1].clone(),
            assignee: Some(contributors[0].clone()),
            title: "Timeouts under load".to_string(),
            state: IssueState::Open,
            created_at: now - Duration::days(5),
            closed_at: None,
        };

        Dataset {
            name: DatasetName::default_name(),
            parameters: GenerationParameters {
                repository_count: 1,
                users_per_repository: 2,
                time_range_days: 30,
                ..Default::default()
            },
            generated_at: now,
            identities,
            repositories: vec![repo],
            commits_by_repo: BTreeMap::from([("acme/api".to_string(), vec![commit])]),
            pull_requests_by_repo: BTreeMap::from([("acme/api".to_string(), vec![pr])]),
            issues_by_repo: BTreeMap::from([("acme/api".to_string(), vec![issue])]),
        }
    }

    #[test]
    fn consistent_dataset_validates() {
        assert!(small_dataset().validate_integrity().is_ok());
    }

    #[test]
    fn counts_every_entity() {
        let counts = small_dataset().counts();
        assert_eq!(
            counts,
            DatasetCounts {
                identities: 2,
                repositories: 1,
                commits: 1,
                pull_requests: 1,
                issues: 1,
            }
        );
    }

    #[test]
    fn unknown_author_is_rejected() {
        let mut dataset = small_dataset();
        dataset.commits_by_repo.get_mut("acme/api").unwrap()[0].author = IdentityId::from("9999");
        let err = dataset.validate_integrity().unwrap_err();
        assert!(matches!(err, DomainError::IntegrityViolation(_)));
    }

    #[test]
    fn unknown_repository_group_is_rejected() {
        let mut dataset = small_dataset();
        let commits = dataset.commits_by_repo.remove("acme/api").unwrap();
        dataset.commits_by_repo.insert("acme/ghost".to_string(), commits);
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn timestamp_outside_window_is_rejected() {
        let mut dataset = small_dataset();
        dataset.issues_by_repo.get_mut("acme/api").unwrap()[0].created_at =
            dataset.generated_at - Duration::days(31);
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn future_timestamp_is_rejected() {
        let mut dataset = small_dataset();
        dataset.commits_by_repo.get_mut("acme/api").unwrap()[0].authored_at =
            dataset.generated_at + Duration::minutes(1);
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn merge_before_creation_is_rejected() {
        let mut dataset = small_dataset();
        let pr = &mut dataset.pull_requests_by_repo.get_mut("acme/api").unwrap()[0];
        pr.merged_at = Some(pr.created_at);
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn merged_without_merge_time_is_rejected() {
        let mut dataset = small_dataset();
        dataset.pull_requests_by_repo.get_mut("acme/api").unwrap()[0].merged_at = None;
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn unknown_reviewer_is_rejected() {
        let mut dataset = small_dataset();
        dataset.pull_requests_by_repo.get_mut("acme/api").unwrap()[0].reviews[0].reviewer =
            IdentityId::from("404");
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn unknown_contributor_is_rejected() {
        let mut dataset = small_dataset();
        dataset.repositories[0].contributors.push(IdentityId::from("404"));
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn closed_issue_without_close_time_is_rejected() {
        let mut dataset = small_dataset();
        dataset.issues_by_repo.get_mut("acme/api").unwrap()[0].state = IssueState::Closed;
        assert!(dataset.validate_integrity().is_err());
    }

    #[test]
    fn repositories_for_filters_by_contributor() {
        let dataset = small_dataset();
        let id = dataset.identities[0].id.clone();
        assert_eq!(dataset.repositories_for(&id).len(), 1);
        assert!(dataset.repositories_for(&IdentityId::from("404")).is_empty());
    }

    #[test]
    fn renamed_keeps_graph() {
        let dataset = small_dataset();
        let renamed = dataset.clone().renamed(DatasetName::new("copy").unwrap());
        assert_eq!(renamed.name.as_str(), "copy");
        assert_eq!(renamed.repositories, dataset.repositories);
    }
}
