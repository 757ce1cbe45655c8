//! Session-scoped identity selection port

use async_trait::async_trait;
use domain::IdentityId;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisting which synthetic identity a session acts as
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStorePort: Send + Sync {
    /// The identity selected for a session, if any
    async fn current_identity(&self, session: &str) -> Result<Option<IdentityId>, ApplicationError>;

    /// Select the identity for a session
    async fn set_current_identity(
        &self,
        session: &str,
        identity: &IdentityId,
    ) -> Result<(), ApplicationError>;
}
