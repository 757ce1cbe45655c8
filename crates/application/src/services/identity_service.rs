//! Identity simulation - lets a session act as a synthetic identity

use std::sync::Arc;

use chrono::{Duration, Utc};
use domain::{IdentityId, Session, SyntheticIdentity, identity_catalog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ModeController;
use crate::{error::ApplicationError, ports::SessionStorePort};

/// A catalog entry as shown in the identity picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityListing {
    #[serde(flatten)]
    pub identity: SyntheticIdentity,
    pub current: bool,
}

/// Service for selecting synthetic identities and issuing simulated sessions
pub struct IdentityService {
    catalog: Vec<SyntheticIdentity>,
    sessions: Arc<dyn SessionStorePort>,
    modes: Arc<ModeController>,
    session_ttl: Duration,
}

impl std::fmt::Debug for IdentityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityService")
            .field("catalog", &self.catalog.len())
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

impl IdentityService {
    pub const DEFAULT_SESSION_TTL_HOURS: i64 = 8;

    pub fn new(sessions: Arc<dyn SessionStorePort>, modes: Arc<ModeController>) -> Self {
        Self {
            catalog: identity_catalog(),
            sessions,
            modes,
            session_ttl: Duration::hours(Self::DEFAULT_SESSION_TTL_HOURS),
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// The fixed identity catalog
    pub fn catalog(&self) -> &[SyntheticIdentity] {
        &self.catalog
    }

    /// Every catalog identity, flagged with the session's current selection
    #[instrument(skip(self))]
    pub async fn list_identities(&self, session: &str) -> Result<Vec<IdentityListing>, ApplicationError> {
        let current = self.current_identity(session).await?;
        Ok(self
            .catalog
            .iter()
            .map(|identity| IdentityListing {
                current: identity.id == current.id,
                identity: identity.clone(),
            })
            .collect())
    }

    /// The identity a session acts as; the first catalog entry until one is selected
    #[instrument(skip(self))]
    pub async fn current_identity(&self, session: &str) -> Result<SyntheticIdentity, ApplicationError> {
        let selected = self.sessions.current_identity(session).await?;
        if let Some(identity) = selected.as_ref().and_then(|id| self.find(id)) {
            return Ok(identity.clone());
        }

        if let Some(stale) = selected {
            debug!(identity = %stale, "Stored identity no longer in catalog, using default");
        }
        self.catalog
            .first()
            .cloned()
            .ok_or_else(|| ApplicationError::Internal("identity catalog is empty".to_string()))
    }

    /// Select the identity a session acts as
    ///
    /// Unknown ids yield `None` and leave the selection untouched.
    #[instrument(skip(self), fields(identity = %id))]
    pub async fn set_current(
        &self,
        session: &str,
        id: &IdentityId,
    ) -> Result<Option<SyntheticIdentity>, ApplicationError> {
        let Some(identity) = self.find(id).cloned() else {
            debug!("Unknown identity requested");
            return Ok(None);
        };

        self.sessions.set_current_identity(session, id).await?;
        info!(handle = %identity.handle, "Session identity switched");
        Ok(Some(identity))
    }

    /// Issue a simulated authenticated session for the current identity
    ///
    /// Only available while a synthetic mode is active.
    #[instrument(skip(self))]
    pub async fn create_session(&self, session: &str) -> Result<Session, ApplicationError> {
        let mode = self.modes.get_mode().await?;
        if !mode.mode.is_synthetic() {
            return Err(ApplicationError::InvalidOperation(
                "simulated sessions are unavailable in live mode".to_string(),
            ));
        }

        let identity = self.current_identity(session).await?;
        let issued = Session::simulated(Uuid::new_v4().to_string(), &identity, Utc::now(), self.session_ttl);
        info!(session_id = %issued.id, role = ?issued.role, "Simulated session issued");
        Ok(issued)
    }

    fn find(&self, id: &IdentityId) -> Option<&SyntheticIdentity> {
        self.catalog.iter().find(|identity| &identity.id == id)
    }
}
