//! Session entity - mirrors the shape of an authenticated OAuth session

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::identity::SyntheticIdentity;
use crate::value_objects::IdentityId;

/// Role derived from an identity's job title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    Manager,
    Lead,
    Developer,
}

impl SessionRole {
    /// Derive the session role from a free-form job title
    #[must_use]
    pub fn from_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("manager") || title.contains("director") {
            Self::Manager
        } else if title.contains("lead") || title.contains("staff") || title.contains("principal") {
            Self::Lead
        } else {
            Self::Developer
        }
    }
}

/// An authenticated user session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: IdentityId,
    pub handle: String,
    pub display_name: String,
    pub avatar_url: String,
    pub role: SessionRole,
    /// Set when the session was issued without an OAuth handshake
    pub simulated: bool,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a simulated session for a synthetic identity
    #[must_use]
    pub fn simulated(
        id: impl Into<String>,
        identity: &SyntheticIdentity,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: identity.id.clone(),
            handle: identity.handle.clone(),
            display_name: identity.display_name.clone(),
            avatar_url: identity.avatar_url.clone(),
            role: SessionRole::from_title(&identity.role),
            simulated: true,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::identity_catalog;

    #[test]
    fn role_derivation() {
        assert_eq!(SessionRole::from_title("Engineering Manager"), SessionRole::Manager);
        assert_eq!(SessionRole::from_title("Tech Lead"), SessionRole::Lead);
        assert_eq!(SessionRole::from_title("Staff Engineer"), SessionRole::Lead);
        assert_eq!(SessionRole::from_title("Backend Engineer"), SessionRole::Developer);
    }

    #[test]
    fn simulated_session_copies_identity() {
        let identity = identity_catalog().remove(1);
        let now = Utc::now();
        let session = Session::simulated("s-1", &identity, now, Duration::hours(8));

        assert_eq!(session.user_id, identity.id);
        assert_eq!(session.display_name, "Priya Patel");
        assert_eq!(session.role, SessionRole::Manager);
        assert!(session.simulated);
        assert_eq!(session.expires_at - session.issued_at, Duration::hours(8));
        assert!(!session.is_expired());
    }
}
