//! Synthetic dataset generation port

use domain::{Dataset, DatasetName, GenerationParameters};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for building synthetic entity graphs
///
/// Generation is CPU-bound and synchronous; callers run it on a blocking
/// thread. Invalid parameters fail before any output is produced.
#[cfg_attr(test, automock)]
pub trait DatasetGeneratorPort: Send + Sync {
    fn generate(
        &self,
        name: &DatasetName,
        parameters: &GenerationParameters,
    ) -> Result<Dataset, ApplicationError>;
}
