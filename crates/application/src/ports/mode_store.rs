//! Mode configuration persistence port

use async_trait::async_trait;
use domain::ModeConfiguration;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisting the single application mode record
///
/// `save` replaces the whole record atomically; a failed save must leave the
/// previously persisted record untouched.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModeStorePort: Send + Sync {
    /// Load the persisted record, if any
    async fn load(&self) -> Result<Option<ModeConfiguration>, ApplicationError>;

    /// Replace the persisted record
    async fn save(&self, configuration: &ModeConfiguration) -> Result<(), ApplicationError>;
}
