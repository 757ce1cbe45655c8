//! Hosting API port
//!
//! The surface of the upstream code-hosting client. The live client and the
//! synthetic one implement the same trait and fail with the same
//! [`ApplicationError`] variants.

use async_trait::async_trait;
use domain::{Commit, IdentityId, Issue, PullRequest, Repository, TimeWindow};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;

/// Port for the code-hosting API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HostingClientPort: Send + Sync {
    /// Repositories visible to an identity
    async fn get_repositories(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Repository>, ApplicationError>;

    /// Commits of a repository (by full name) within a window, oldest first
    async fn get_commits(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Commit>, ApplicationError>;

    /// Pull requests of a repository opened within a window, oldest first
    async fn get_pull_requests(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<PullRequest>, ApplicationError>;

    /// Issues of a repository opened within a window, oldest first
    async fn get_issues(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Issue>, ApplicationError>;
}

/// A single call against the hosting API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum HostingOperation {
    Repositories {
        identity: IdentityId,
    },
    Commits {
        repository: String,
        window: TimeWindow,
    },
    PullRequests {
        repository: String,
        window: TimeWindow,
    },
    Issues {
        repository: String,
        window: TimeWindow,
    },
}

impl HostingOperation {
    /// Short operation name for logs
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Repositories { .. } => "get_repositories",
            Self::Commits { .. } => "get_commits",
            Self::PullRequests { .. } => "get_pull_requests",
            Self::Issues { .. } => "get_issues",
        }
    }

    /// The resource the operation targets, as it would appear in an API path
    #[must_use]
    pub fn resource(&self) -> String {
        match self {
            Self::Repositories { identity } => format!("users/{identity}/repos"),
            Self::Commits { repository, .. } => format!("repos/{repository}/commits"),
            Self::PullRequests { repository, .. } => format!("repos/{repository}/pulls"),
            Self::Issues { repository, .. } => format!("repos/{repository}/issues"),
        }
    }

    /// Run the operation against a client
    pub async fn execute(
        &self,
        client: &dyn HostingClientPort,
    ) -> Result<HostingResponse, ApplicationError> {
        match self {
            Self::Repositories { identity } => client
                .get_repositories(identity)
                .await
                .map(HostingResponse::Repositories),
            Self::Commits { repository, window } => client
                .get_commits(repository, window)
                .await
                .map(HostingResponse::Commits),
            Self::PullRequests { repository, window } => client
                .get_pull_requests(repository, window)
                .await
                .map(HostingResponse::PullRequests),
            Self::Issues { repository, window } => client
                .get_issues(repository, window)
                .await
                .map(HostingResponse::Issues),
        }
    }
}

/// Result of a [`HostingOperation`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum HostingResponse {
    Repositories(Vec<Repository>),
    Commits(Vec<Commit>),
    PullRequests(Vec<PullRequest>),
    Issues(Vec<Issue>),
}

impl HostingResponse {
    /// Number of items returned
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Repositories(items) => items.len(),
            Self::Commits(items) => items.len(),
            Self::PullRequests(items) => items.len(),
            Self::Issues(items) => items.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
