//! Dataset service - named synthetic datasets with lazy generation
//!
//! Datasets are generated on first access and persisted through the
//! [`DatasetStorePort`]. Concurrent first access to the same name triggers
//! exactly one generation; every other caller waits for and shares that
//! result.

use std::{collections::HashMap, sync::Arc, time::Instant};

use chrono::{DateTime, Utc};
use domain::{Dataset, DatasetName, GenerationParameters};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{DatasetGeneratorPort, DatasetStorePort},
};

/// Portable JSON envelope around an exported dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetExport {
    pub format: String,
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub dataset: Dataset,
}

impl DatasetExport {
    pub const FORMAT: &'static str = "teampulse-dataset";
    pub const VERSION: u32 = 1;

    fn wrap(dataset: Dataset) -> Self {
        Self {
            format: Self::FORMAT.to_string(),
            version: Self::VERSION,
            exported_at: Utc::now(),
            dataset,
        }
    }
}

type Pending = Arc<OnceCell<Arc<Dataset>>>;

/// Service owning the set of named datasets
pub struct DatasetService {
    store: Arc<dyn DatasetStorePort>,
    generator: Arc<dyn DatasetGeneratorPort>,
    default_parameters: GenerationParameters,
    cache: RwLock<HashMap<DatasetName, Arc<Dataset>>>,
    inflight: Mutex<HashMap<DatasetName, Pending>>,
    /// Serializes every write to the store against first-access loads
    writes: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for DatasetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetService")
            .field("default_parameters", &self.default_parameters)
            .field("cached", &self.cache.read().len())
            .finish_non_exhaustive()
    }
}

impl DatasetService {
    pub fn new(
        store: Arc<dyn DatasetStorePort>,
        generator: Arc<dyn DatasetGeneratorPort>,
        default_parameters: GenerationParameters,
    ) -> Self {
        Self {
            store,
            generator,
            default_parameters,
            cache: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Parameters used when a dataset is created implicitly
    pub fn default_parameters(&self) -> &GenerationParameters {
        &self.default_parameters
    }

    /// Get a dataset, generating and persisting it on first access
    #[instrument(skip(self), fields(dataset = %name))]
    pub async fn get_or_create(&self, name: &DatasetName) -> Result<Arc<Dataset>, ApplicationError> {
        if let Some(hit) = self.cached(name) {
            return Ok(hit);
        }

        let pending = Arc::clone(self.inflight.lock().entry(name.clone()).or_default());
        let result = pending
            .get_or_try_init(|| self.load_or_generate(name))
            .await
            .cloned();

        {
            let mut inflight = self.inflight.lock();
            if inflight
                .get(name)
                .is_some_and(|current| Arc::ptr_eq(current, &pending))
            {
                inflight.remove(name);
            }
        }

        // A reset that completed while we waited wins over the shared result
        let dataset = result?;
        Ok(self.cached(name).unwrap_or(dataset))
    }

    /// Get a dataset without generating it
    #[instrument(skip(self), fields(dataset = %name))]
    pub async fn get(&self, name: &DatasetName) -> Result<Option<Arc<Dataset>>, ApplicationError> {
        if let Some(hit) = self.cached(name) {
            return Ok(Some(hit));
        }

        // Held across the store read so a concurrent reset or delete cannot
        // be overwritten by the graph read before it
        let _writes = self.writes.lock().await;
        if let Some(hit) = self.cached(name) {
            return Ok(Some(hit));
        }

        let Some(dataset) = self.store.get(name).await? else {
            return Ok(None);
        };
        let dataset = Arc::new(dataset);
        self.cache.write().insert(name.clone(), Arc::clone(&dataset));
        Ok(Some(dataset))
    }

    /// Regenerate a dataset and replace whatever was stored under its name
    ///
    /// A missing dataset is simply created. The previous graph stays in place
    /// until the new one has been generated and persisted, so a failed reset
    /// leaves the store unchanged.
    #[doc(alias = "reset")]
    #[instrument(skip(self, parameters), fields(dataset = %name))]
    pub async fn upsert(
        &self,
        name: &DatasetName,
        parameters: Option<GenerationParameters>,
    ) -> Result<Arc<Dataset>, ApplicationError> {
        let parameters = parameters.unwrap_or_else(|| self.default_parameters.clone());
        parameters.check()?;

        let _writes = self.writes.lock().await;
        let dataset = self.generate(name, parameters).await?;
        self.store.put(&dataset).await?;

        let counts = dataset.counts();
        let dataset = Arc::new(dataset);
        self.cache.write().insert(name.clone(), Arc::clone(&dataset));

        info!(
            repositories = counts.repositories,
            commits = counts.commits,
            pull_requests = counts.pull_requests,
            "Dataset regenerated"
        );
        Ok(dataset)
    }

    /// Delete a dataset
    ///
    /// # Returns
    /// true if the dataset existed
    #[instrument(skip(self), fields(dataset = %name))]
    pub async fn delete(&self, name: &DatasetName) -> Result<bool, ApplicationError> {
        let _writes = self.writes.lock().await;
        let deleted = self.store.delete(name).await?;
        self.cache.write().remove(name);
        if deleted {
            info!("Dataset deleted");
        }
        Ok(deleted)
    }

    /// Names of all datasets in creation order
    pub async fn list(&self) -> Result<Vec<DatasetName>, ApplicationError> {
        self.store.list_names().await
    }

    /// Serialize a dataset into the portable JSON envelope
    ///
    /// Never generates: exporting a dataset that does not exist fails with
    /// [`ApplicationError::NotFound`].
    #[instrument(skip(self), fields(dataset = %name))]
    pub async fn export(&self, name: &DatasetName) -> Result<Vec<u8>, ApplicationError> {
        let dataset = self
            .get(name)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("dataset {name}")))?;

        let envelope = DatasetExport::wrap(Dataset::clone(&dataset));
        serde_json::to_vec_pretty(&envelope)
            .map_err(|e| ApplicationError::Internal(format!("Failed to serialize dataset: {e}")))
    }

    /// Replace a dataset with the contents of an exported envelope
    ///
    /// The envelope is stored under `name` regardless of the name it was
    /// exported with. Malformed or inconsistent input is rejected before the
    /// store is touched.
    #[instrument(skip(self, blob), fields(dataset = %name, bytes = blob.len()))]
    pub async fn import(&self, name: &DatasetName, blob: &[u8]) -> Result<Arc<Dataset>, ApplicationError> {
        let envelope: DatasetExport = serde_json::from_slice(blob).map_err(|e| {
            ApplicationError::from(domain::DomainError::validation(format!(
                "Malformed dataset export: {e}"
            )))
        })?;

        if envelope.format != DatasetExport::FORMAT || envelope.version != DatasetExport::VERSION {
            return Err(domain::DomainError::validation(format!(
                "Unsupported export format {} v{}",
                envelope.format, envelope.version
            ))
            .into());
        }

        let dataset = envelope.dataset.renamed(name.clone());
        dataset.validate_integrity()?;

        let _writes = self.writes.lock().await;
        self.store.put(&dataset).await?;
        let dataset = Arc::new(dataset);
        self.cache.write().insert(name.clone(), Arc::clone(&dataset));

        info!(exported_at = %envelope.exported_at, "Dataset imported");
        Ok(dataset)
    }

    fn cached(&self, name: &DatasetName) -> Option<Arc<Dataset>> {
        self.cache.read().get(name).cloned()
    }

    async fn load_or_generate(&self, name: &DatasetName) -> Result<Arc<Dataset>, ApplicationError> {
        let _writes = self.writes.lock().await;
        if let Some(hit) = self.cached(name) {
            return Ok(hit);
        }

        let dataset = if let Some(stored) = self.store.get(name).await? {
            debug!("Dataset loaded from store");
            stored
        } else {
            info!("Dataset missing, generating with default parameters");
            let generated = self.generate(name, self.default_parameters.clone()).await?;
            self.store.put(&generated).await?;
            generated
        };

        let dataset = Arc::new(dataset);
        self.cache.write().insert(name.clone(), Arc::clone(&dataset));
        Ok(dataset)
    }

    async fn generate(
        &self,
        name: &DatasetName,
        parameters: GenerationParameters,
    ) -> Result<Dataset, ApplicationError> {
        let generator = Arc::clone(&self.generator);
        let task_name = name.clone();
        let started = Instant::now();

        let dataset = tokio::task::spawn_blocking(move || generator.generate(&task_name, &parameters))
            .await
            .map_err(|e| {
                warn!(error = %e, "Generation task failed");
                ApplicationError::Generation(format!("generation task failed: {e}"))
            })??;

        debug!(
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Dataset generated"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;
    use domain::{DomainError, IdentityId, Repository, identity_catalog};

    use super::*;
    use crate::ports::MockDatasetStorePort;

    /// In-memory store keeping insertion order
    #[derive(Default)]
    struct MemoryStore {
        datasets: Mutex<Vec<Dataset>>,
    }

    #[async_trait::async_trait]
    impl DatasetStorePort for MemoryStore {
        async fn get(&self, name: &DatasetName) -> Result<Option<Dataset>, ApplicationError> {
            Ok(self.datasets.lock().iter().find(|d| &d.name == name).cloned())
        }

        async fn put(&self, dataset: &Dataset) -> Result<(), ApplicationError> {
            let mut datasets = self.datasets.lock();
            match datasets.iter_mut().find(|d| d.name == dataset.name) {
                Some(existing) => *existing = dataset.clone(),
                None => datasets.push(dataset.clone()),
            }
            Ok(())
        }

        async fn delete(&self, name: &DatasetName) -> Result<bool, ApplicationError> {
            let mut datasets = self.datasets.lock();
            let before = datasets.len();
            datasets.retain(|d| &d.name != name);
            Ok(datasets.len() != before)
        }

        async fn list_names(&self) -> Result<Vec<DatasetName>, ApplicationError> {
            Ok(self.datasets.lock().iter().map(|d| d.name.clone()).collect())
        }
    }

    /// Generator producing one repository per call, tagged with the call number
    #[derive(Default)]
    struct CountingGenerator {
        calls: AtomicUsize,
    }

    impl DatasetGeneratorPort for CountingGenerator {
        fn generate(
            &self,
            name: &DatasetName,
            parameters: &GenerationParameters,
        ) -> Result<Dataset, ApplicationError> {
            parameters.check()?;
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::thread::sleep(std::time::Duration::from_millis(20));

            let identity = identity_catalog().remove(0);
            let generated_at = Utc::now();
            let repository = Repository {
                id: call as u64,
                owner: "acme".to_string(),
                name: format!("service-{call}"),
                full_name: format!("acme/service-{call}"),
                description: None,
                language: Some("Rust".to_string()),
                default_branch: "main".to_string(),
                private: false,
                stars: 0,
                created_at: generated_at - Duration::days(400),
                contributors: vec![identity.id.clone()],
            };
            Ok(Dataset {
                name: name.clone(),
                parameters: parameters.clone(),
                generated_at,
                identities: vec![identity],
                repositories: vec![repository],
                commits_by_repo: Default::default(),
                pull_requests_by_repo: Default::default(),
                issues_by_repo: Default::default(),
            })
        }
    }

    /// Store whose reads take a while, leaving room for a concurrent write
    struct SlowReadStore {
        inner: MemoryStore,
        delay: std::time::Duration,
    }

    #[async_trait::async_trait]
    impl DatasetStorePort for SlowReadStore {
        async fn get(&self, name: &DatasetName) -> Result<Option<Dataset>, ApplicationError> {
            let found = self.inner.get(name).await;
            tokio::time::sleep(self.delay).await;
            found
        }

        async fn put(&self, dataset: &Dataset) -> Result<(), ApplicationError> {
            self.inner.put(dataset).await
        }

        async fn delete(&self, name: &DatasetName) -> Result<bool, ApplicationError> {
            self.inner.delete(name).await
        }

        async fn list_names(&self) -> Result<Vec<DatasetName>, ApplicationError> {
            self.inner.list_names().await
        }
    }

    /// Service over a slow store already holding `name`, plus the stored graph
    async fn slow_service(name: &DatasetName) -> (Arc<DatasetService>, Dataset) {
        let generator = Arc::new(CountingGenerator::default());
        let stored = generator.generate(name, &GenerationParameters::default()).unwrap();
        let store = SlowReadStore {
            inner: MemoryStore::default(),
            delay: std::time::Duration::from_millis(200),
        };
        store.put(&stored).await.unwrap();

        let service = DatasetService::new(Arc::new(store), generator, GenerationParameters::default());
        (Arc::new(service), stored)
    }

    fn service() -> (Arc<MemoryStore>, Arc<CountingGenerator>, DatasetService) {
        let store = Arc::new(MemoryStore::default());
        let generator = Arc::new(CountingGenerator::default());
        let service = DatasetService::new(
            store.clone(),
            generator.clone(),
            GenerationParameters::default(),
        );
        (store, generator, service)
    }

    fn name(value: &str) -> DatasetName {
        DatasetName::new(value).unwrap()
    }

    #[tokio::test]
    async fn get_or_create_generates_once_and_persists() {
        let (store, generator, service) = service();

        let first = service.get_or_create(&name("demo")).await.unwrap();
        let second = service.get_or_create(&name("demo")).await.unwrap();

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.repositories, second.repositories);
        assert!(store.get(&name("demo")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn stored_dataset_is_not_regenerated() {
        let (store, generator, _) = service();
        let preset = generator
            .generate(&name("kept"), &GenerationParameters::default())
            .unwrap();
        store.put(&preset).await.unwrap();

        let service = DatasetService::new(store, generator.clone(), GenerationParameters::default());
        let loaded = service.get_or_create(&name("kept")).await.unwrap();

        assert_eq!(loaded.repositories, preset.repositories);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_access_generates_once() {
        let (_, generator, service) = service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.get_or_create(&name("shared")).await })
            })
            .collect();
        let results = futures::future::join_all(handles).await;

        let repos: Vec<_> = results
            .into_iter()
            .map(|r| r.unwrap().unwrap().repositories[0].full_name.clone())
            .collect();
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(repos.iter().all(|r| r == &repos[0]));
    }

    #[tokio::test]
    async fn upsert_replaces_every_entity() {
        let (_, _, service) = service();
        let before = service.get_or_create(&name("demo")).await.unwrap();

        service.upsert(&name("demo"), None).await.unwrap();
        let after = service.get_or_create(&name("demo")).await.unwrap();

        let old: Vec<_> = before.repositories.iter().map(|r| r.id).collect();
        assert!(after.repositories.iter().all(|r| !old.contains(&r.id)));
    }

    #[tokio::test]
    async fn upsert_of_missing_dataset_creates_it() {
        let (_, _, service) = service();
        service.upsert(&name("fresh"), None).await.unwrap();
        assert_eq!(service.list().await.unwrap(), vec![name("fresh")]);
    }

    #[tokio::test]
    async fn upsert_rejects_invalid_parameters_without_mutation() {
        let (_, generator, service) = service();
        service.get_or_create(&name("demo")).await.unwrap();

        let params = GenerationParameters {
            repository_count: 0,
            ..Default::default()
        };
        let err = service.upsert(&name("demo"), Some(params)).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reset_keeps_list_position() {
        let (_, _, service) = service();
        for n in ["a", "b", "c"] {
            service.get_or_create(&name(n)).await.unwrap();
        }
        service.upsert(&name("a"), None).await.unwrap();

        assert_eq!(service.list().await.unwrap(), vec![name("a"), name("b"), name("c")]);
    }

    #[tokio::test]
    async fn failed_persist_keeps_previous_dataset() {
        let mut store = MockDatasetStorePort::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_put()
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_put()
            .returning(|_| Err(ApplicationError::Persistence("locked".to_string())));
        let service = DatasetService::new(
            Arc::new(store),
            Arc::new(CountingGenerator::default()),
            GenerationParameters::default(),
        );

        let before = service.get_or_create(&name("demo")).await.unwrap();
        let err = service.upsert(&name("demo"), None).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Persistence(_)));

        let after = service.get_or_create(&name("demo")).await.unwrap();
        assert_eq!(before.repositories, after.repositories);
    }

    #[tokio::test]
    async fn delete_removes_dataset() {
        let (_, _, service) = service();
        service.get_or_create(&name("gone")).await.unwrap();

        assert!(service.delete(&name("gone")).await.unwrap());
        assert!(!service.delete(&name("gone")).await.unwrap());
        assert!(service.get(&name("gone")).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn read_racing_a_reset_never_restores_the_old_graph() {
        let n = name("raced");
        let (service, stored) = slow_service(&n).await;

        let reader = {
            let service = Arc::clone(&service);
            let n = n.clone();
            tokio::spawn(async move { service.get(&n).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let reset = service.upsert(&n, None).await.unwrap();
        reader.await.unwrap().unwrap();

        let after = service.get_or_create(&n).await.unwrap();
        assert_ne!(reset.repositories[0].id, stored.repositories[0].id);
        assert_eq!(after.repositories, reset.repositories);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn read_racing_a_delete_does_not_resurrect_it() {
        let n = name("raced");
        let (service, _) = slow_service(&n).await;

        let reader = {
            let service = Arc::clone(&service);
            let n = n.clone();
            tokio::spawn(async move { service.get(&n).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(service.delete(&n).await.unwrap());
        reader.await.unwrap().unwrap();

        assert!(service.get(&n).await.unwrap().is_none());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn export_racing_a_reset_leaves_the_new_graph_cached() {
        let n = name("raced");
        let (service, stored) = slow_service(&n).await;

        let exporter = {
            let service = Arc::clone(&service);
            let n = n.clone();
            tokio::spawn(async move { service.export(&n).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        let reset = service.upsert(&n, None).await.unwrap();

        let blob = exporter.await.unwrap().unwrap();
        let exported: DatasetExport = serde_json::from_slice(&blob).unwrap();
        assert_eq!(exported.dataset.repositories, stored.repositories);

        let after = service.get(&n).await.unwrap().unwrap();
        assert_eq!(after.repositories, reset.repositories);
    }

    #[tokio::test]
    async fn export_import_preserves_graph() {
        let (_, _, service) = service();
        let original = service.get_or_create(&name("source")).await.unwrap();

        let blob = service.export(&name("source")).await.unwrap();
        let imported = service.import(&name("copy"), &blob).await.unwrap();

        assert_eq!(imported.name, name("copy"));
        assert_eq!(imported.repositories, original.repositories);
        assert_eq!(imported.generated_at, original.generated_at);
        assert_eq!(service.list().await.unwrap(), vec![name("source"), name("copy")]);
    }

    #[tokio::test]
    async fn export_of_missing_dataset_is_not_found() {
        let (_, generator, service) = service();
        let err = service.export(&name("nope")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn import_rejects_malformed_blob() {
        let (_, _, service) = service();
        let err = service.import(&name("x"), b"{not json").await.unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn import_rejects_broken_references() {
        let (_, _, service) = service();
        let dataset = service.get_or_create(&name("source")).await.unwrap();

        let mut broken = Dataset::clone(&dataset);
        broken.repositories[0]
            .contributors
            .push(IdentityId::new("ghost"));
        let blob = serde_json::to_vec(&DatasetExport::wrap(broken)).unwrap();

        let err = service.import(&name("source"), &blob).await.unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::IntegrityViolation(_))
        ));
        let stored = service.get(&name("source")).await.unwrap().unwrap();
        assert_eq!(stored.repositories, dataset.repositories);
    }

    #[tokio::test]
    async fn import_rejects_foreign_format() {
        let (_, _, service) = service();
        let dataset = service.get_or_create(&name("source")).await.unwrap();
        let mut envelope = DatasetExport::wrap(Dataset::clone(&dataset));
        envelope.format = "other".to_string();
        let blob = serde_json::to_vec(&envelope).unwrap();

        assert!(service.import(&name("x"), &blob).await.unwrap_err().is_validation());
    }
}
