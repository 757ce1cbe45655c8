//! Hosting client backed by a synthetic dataset
//!
//! Answers the hosting API surface from an in-memory [`Dataset`]. Failure
//! shapes match the live API: unknown users and repositories are
//! `NotFound` with the resource path.

use std::sync::Arc;

use application::{error::ApplicationError, ports::HostingClientPort};
use async_trait::async_trait;
use domain::{Commit, Dataset, IdentityId, Issue, PullRequest, Repository, TimeWindow};
use tracing::{debug, instrument};

/// Hosting client reading from one dataset
#[derive(Debug, Clone)]
pub struct SyntheticHostingClient {
    dataset: Arc<Dataset>,
}

impl SyntheticHostingClient {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    fn repository(&self, full_name: &str) -> Result<&Repository, ApplicationError> {
        self.dataset
            .repository(full_name)
            .ok_or_else(|| ApplicationError::NotFound(format!("repos/{full_name}")))
    }
}

#[async_trait]
impl HostingClientPort for SyntheticHostingClient {
    #[instrument(skip(self), fields(dataset = %self.dataset.name))]
    async fn get_repositories(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Repository>, ApplicationError> {
        if self.dataset.identity(identity).is_none() {
            return Err(ApplicationError::NotFound(format!("users/{identity}")));
        }

        let repositories: Vec<Repository> = self
            .dataset
            .repositories_for(identity)
            .into_iter()
            .cloned()
            .collect();
        debug!(count = repositories.len(), "Served synthetic repositories");
        Ok(repositories)
    }

    #[instrument(skip(self, window), fields(dataset = %self.dataset.name))]
    async fn get_commits(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Commit>, ApplicationError> {
        let repository = self.repository(repository)?;
        Ok(self
            .dataset
            .commits(&repository.full_name)
            .iter()
            .filter(|c| window.contains(c.authored_at))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, window), fields(dataset = %self.dataset.name))]
    async fn get_pull_requests(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<PullRequest>, ApplicationError> {
        let repository = self.repository(repository)?;
        Ok(self
            .dataset
            .pull_requests(&repository.full_name)
            .iter()
            .filter(|pr| window.contains(pr.created_at))
            .cloned()
            .collect())
    }

    #[instrument(skip(self, window), fields(dataset = %self.dataset.name))]
    async fn get_issues(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Issue>, ApplicationError> {
        let repository = self.repository(repository)?;
        Ok(self
            .dataset
            .issues(&repository.full_name)
            .iter()
            .filter(|issue| window.contains(issue.created_at))
            .cloned()
            .collect())
    }
}
