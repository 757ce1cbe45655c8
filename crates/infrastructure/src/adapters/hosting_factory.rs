//! Hosting client selection by mode

use std::sync::Arc;

use application::{DatasetService, error::ApplicationError, ports::HostingClientPort};
use domain::{DatasetName, ModeConfiguration};
use tracing::debug;

use super::SyntheticHostingClient;

/// Builds the hosting client for a mode record
///
/// Live mode gets the live client as is. Synthetic modes get a client over
/// the record's dataset, which is generated on first use.
#[derive(Clone)]
pub struct HostingClientFactory {
    live: Arc<dyn HostingClientPort>,
    datasets: Arc<DatasetService>,
}

impl std::fmt::Debug for HostingClientFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostingClientFactory")
            .field("datasets", &self.datasets)
            .finish_non_exhaustive()
    }
}

impl HostingClientFactory {
    pub fn new(live: Arc<dyn HostingClientPort>, datasets: Arc<DatasetService>) -> Self {
        Self { live, datasets }
    }

    pub fn datasets(&self) -> &Arc<DatasetService> {
        &self.datasets
    }

    pub async fn client_for(
        &self,
        configuration: &ModeConfiguration,
    ) -> Result<Arc<dyn HostingClientPort>, ApplicationError> {
        if !configuration.mode.is_synthetic() {
            return Ok(Arc::clone(&self.live));
        }

        let name = configuration
            .dataset_id
            .clone()
            .unwrap_or_else(DatasetName::default_name);
        let dataset = self.datasets.get_or_create(&name).await?;
        debug!(mode = %configuration.mode, dataset = %name, "Using synthetic hosting client");
        Ok(Arc::new(SyntheticHostingClient::new(dataset)))
    }
}
