//! SQLite dataset store
//!
//! Implements the `DatasetStorePort`. Each dataset is one row holding the
//! whole entity graph as JSON, so a replace is a single-statement upsert and
//! readers never see a half-written graph.

use std::sync::Arc;

use application::{error::ApplicationError, ports::DatasetStorePort};
use async_trait::async_trait;
use chrono::Utc;
use domain::{Dataset, DatasetName};
use rusqlite::params;
use tokio::task;
use tracing::{debug, instrument};

use super::{
    connection::ConnectionPool,
    error::{OptionalExt, map_join_error, map_json_error, map_pool_error, map_sqlite_error},
};

/// SQLite-based dataset store
#[derive(Debug, Clone)]
pub struct SqliteDatasetStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteDatasetStore {
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatasetStorePort for SqliteDatasetStore {
    #[instrument(skip(self), fields(dataset = %name))]
    async fn get(&self, name: &DatasetName) -> Result<Option<Dataset>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let name = name.to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            let stored: Option<String> = conn
                .query_row(
                    "SELECT graph_json FROM datasets WHERE name = ?1",
                    [&name],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sqlite_error)?;

            stored
                .map(|json| serde_json::from_str(&json).map_err(map_json_error))
                .transpose()
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, dataset), fields(dataset = %dataset.name))]
    async fn put(&self, dataset: &Dataset) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let name = dataset.name.to_string();
        let generated_at = dataset.generated_at.to_rfc3339();
        let parameters_json = serde_json::to_string(&dataset.parameters).map_err(map_json_error)?;
        let graph_json = serde_json::to_string(dataset).map_err(map_json_error)?;

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let now = Utc::now().to_rfc3339();

            // A replaced dataset keeps its position and creation time
            conn.execute(
                "INSERT INTO datasets (name, position, parameters_json, graph_json, generated_at, created_at, updated_at)
                 VALUES (?1, (SELECT COALESCE(MAX(position), 0) + 1 FROM datasets), ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(name) DO UPDATE SET
                    parameters_json = excluded.parameters_json,
                    graph_json = excluded.graph_json,
                    generated_at = excluded.generated_at,
                    updated_at = excluded.updated_at",
                params![name, parameters_json, graph_json, generated_at, now],
            )
            .map_err(map_sqlite_error)?;

            debug!(bytes = graph_json.len(), "Saved dataset");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self), fields(dataset = %name))]
    async fn delete(&self, name: &DatasetName) -> Result<bool, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let name = name.to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let rows = conn
                .execute("DELETE FROM datasets WHERE name = ?1", [&name])
                .map_err(map_sqlite_error)?;
            Ok(rows > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self))]
    async fn list_names(&self) -> Result<Vec<DatasetName>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let mut stmt = conn
                .prepare("SELECT name FROM datasets ORDER BY position")
                .map_err(map_sqlite_error)?;

            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(map_sqlite_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_sqlite_error)?;

            names
                .into_iter()
                .map(|name| {
                    DatasetName::new(name)
                        .map_err(|e| ApplicationError::Persistence(format!("Stored dataset name: {e}")))
                })
                .collect()
        })
        .await
        .map_err(map_join_error)?
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use domain::{GenerationParameters, Repository, identity_catalog};

    use super::*;
    use crate::{config::DatabaseConfig, persistence::connection::create_pool};

    fn create_test_store() -> SqliteDatasetStore {
        let pool = create_pool(&DatabaseConfig::in_memory()).unwrap();
        SqliteDatasetStore::new(Arc::new(pool))
    }

    fn dataset(name: &str, repo: &str) -> Dataset {
        let identities = identity_catalog();
        let generated_at = Utc::now();
        Dataset {
            name: DatasetName::new(name).unwrap(),
            parameters: GenerationParameters::default(),
            generated_at,
            repositories: vec![Repository {
                id: 7,
                owner: "acme".to_string(),
                name: repo.to_string(),
                full_name: format!("acme/{repo}"),
                description: Some("Billing service".to_string()),
                language: Some("Go".to_string()),
                default_branch: "main".to_string(),
                private: true,
                stars: 12,
                created_at: generated_at - Duration::days(365),
                contributors: vec![identities[0].id.clone()],
            }],
            identities,
            commits_by_repo: Default::default(),
            pull_requests_by_repo: Default::default(),
            issues_by_repo: Default::default(),
        }
    }

    #[tokio::test]
    async fn put_and_get_round_trip() {
        let store = create_test_store();
        let original = dataset("demo", "billing");
        store.put(&original).await.unwrap();

        let loaded = store.get(&original.name).await.unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn missing_dataset_is_none() {
        let store = create_test_store();
        let name = DatasetName::new("absent").unwrap();
        assert!(store.get(&name).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_replaces_existing_graph() {
        let store = create_test_store();
        store.put(&dataset("demo", "billing")).await.unwrap();
        store.put(&dataset("demo", "payments")).await.unwrap();

        let loaded = store
            .get(&DatasetName::new("demo").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.repositories[0].name, "payments");
        assert_eq!(store.list_names().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_keeps_creation_order_across_replace() {
        let store = create_test_store();
        for name in ["first", "second", "third"] {
            store.put(&dataset(name, "svc")).await.unwrap();
        }
        store.put(&dataset("first", "rebuilt")).await.unwrap();

        let names: Vec<_> = store
            .list_names()
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = create_test_store();
        let original = dataset("temp", "svc");
        store.put(&original).await.unwrap();

        assert!(store.delete(&original.name).await.unwrap());
        assert!(!store.delete(&original.name).await.unwrap());
        assert!(store.list_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn new_dataset_after_delete_goes_last() {
        let store = create_test_store();
        store.put(&dataset("a", "svc")).await.unwrap();
        store.put(&dataset("b", "svc")).await.unwrap();
        store.delete(&DatasetName::new("a").unwrap()).await.unwrap();
        store.put(&dataset("a", "svc")).await.unwrap();

        let names: Vec<_> = store
            .list_names()
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(names, ["b", "a"]);
    }
}
