//! Repository entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::IdentityId;

/// A hosted source repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub owner: String,
    pub name: String,
    /// `owner/name`, unique within a dataset
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub default_branch: String,
    pub private: bool,
    pub stars: u32,
    pub created_at: DateTime<Utc>,
    /// Identities with push access
    pub contributors: Vec<IdentityId>,
}

impl Repository {
    #[must_use]
    pub fn has_contributor(&self, identity: &IdentityId) -> bool {
        self.contributors.contains(identity)
    }
}
