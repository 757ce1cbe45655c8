//! Placeholder for the live hosting client
//!
//! Used in live mode when no upstream client is wired in. Every call fails
//! the way the hosting API does for a request without credentials.

use application::{error::ApplicationError, ports::HostingClientPort};
use async_trait::async_trait;
use domain::{Commit, IdentityId, Issue, PullRequest, Repository, TimeWindow};
use tracing::warn;

const MESSAGE: &str = "No hosting API credentials configured";

/// Live hosting client that rejects every request
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredHostingClient;

impl UnconfiguredHostingClient {
    fn reject<T>(operation: &str) -> Result<T, ApplicationError> {
        warn!(operation, "Live hosting call without a configured client");
        Err(ApplicationError::NotAuthorized(MESSAGE.to_string()))
    }
}

#[async_trait]
impl HostingClientPort for UnconfiguredHostingClient {
    async fn get_repositories(&self, _: &IdentityId) -> Result<Vec<Repository>, ApplicationError> {
        Self::reject("get_repositories")
    }

    async fn get_commits(&self, _: &str, _: &TimeWindow) -> Result<Vec<Commit>, ApplicationError> {
        Self::reject("get_commits")
    }

    async fn get_pull_requests(
        &self,
        _: &str,
        _: &TimeWindow,
    ) -> Result<Vec<PullRequest>, ApplicationError> {
        Self::reject("get_pull_requests")
    }

    async fn get_issues(&self, _: &str, _: &TimeWindow) -> Result<Vec<Issue>, ApplicationError> {
        Self::reject("get_issues")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_is_unauthorized() {
        let client = UnconfiguredHostingClient;
        assert!(matches!(
            client.get_repositories(&IdentityId::new("1001")).await,
            Err(ApplicationError::NotAuthorized(_))
        ));
        assert!(matches!(
            client.get_issues("acme/api", &TimeWindow::unbounded()).await,
            Err(ApplicationError::NotAuthorized(_))
        ));
    }
}
