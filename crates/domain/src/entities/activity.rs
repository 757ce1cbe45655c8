//! Activity entities - commits, pull requests, reviews and issues

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::IdentityId;

/// A commit on a repository's default branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    /// Full name of the owning repository
    pub repository: String,
    pub author: IdentityId,
    pub message: String,
    pub authored_at: DateTime<Utc>,
    pub additions: u32,
    pub deletions: u32,
}

/// Lifecycle state of a pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

/// Outcome of a single review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
}

/// A review submitted on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub reviewer: IdentityId,
    pub state: ReviewState,
    pub submitted_at: DateTime<Utc>,
}

/// A pull request and its reviews
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub repository: String,
    pub author: IdentityId,
    pub title: String,
    pub state: PullRequestState,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl PullRequest {
    /// Hours between opening the pull request and the first review
    #[must_use]
    pub fn first_response_hours(&self) -> Option<f64> {
        self.reviews
            .iter()
            .map(|r| r.submitted_at)
            .min()
            .map(|first| (first - self.created_at).num_seconds() as f64 / 3600.0)
    }

    #[must_use]
    pub const fn is_merged(&self) -> bool {
        matches!(self.state, PullRequestState::Merged)
    }
}

/// Lifecycle state of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

/// A tracked issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub repository: String,
    pub author: IdentityId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<IdentityId>,
    pub title: String,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}
