//! Dataset persistence port

use async_trait::async_trait;
use domain::{Dataset, DatasetName};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for persisting named datasets
///
/// Datasets are stored and replaced as a whole. Implementations must make
/// `put` atomic: readers see either the previous graph or the new one.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatasetStorePort: Send + Sync {
    /// Get a dataset by name
    async fn get(&self, name: &DatasetName) -> Result<Option<Dataset>, ApplicationError>;

    /// Insert or replace a dataset
    ///
    /// A replaced dataset keeps its original position in [`Self::list_names`].
    async fn put(&self, dataset: &Dataset) -> Result<(), ApplicationError>;

    /// Delete a dataset
    ///
    /// # Returns
    /// true if the dataset was deleted, false if it didn't exist
    async fn delete(&self, name: &DatasetName) -> Result<bool, ApplicationError>;

    /// Names of all datasets in creation order
    async fn list_names(&self) -> Result<Vec<DatasetName>, ApplicationError>;
}
