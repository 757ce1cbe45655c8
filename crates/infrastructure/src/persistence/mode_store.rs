//! SQLite mode record store
//!
//! Implements the `ModeStorePort` for the single active mode record.

use std::sync::Arc;

use application::{error::ApplicationError, ports::ModeStorePort};
use async_trait::async_trait;
use chrono::Utc;
use domain::ModeConfiguration;
use rusqlite::params;
use tokio::task;
use tracing::{debug, instrument, warn};

use super::{
    connection::ConnectionPool,
    error::{OptionalExt, map_join_error, map_json_error, map_pool_error, map_sqlite_error},
};

/// SQLite-based mode record store
#[derive(Debug, Clone)]
pub struct SqliteModeStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteModeStore {
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModeStorePort for SqliteModeStore {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Option<ModeConfiguration>, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            let stored: Option<String> = conn
                .query_row(
                    "SELECT config_json FROM mode_configuration WHERE id = 1",
                    [],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sqlite_error)?;

            let Some(json) = stored else {
                debug!("No mode record persisted");
                return Ok(None);
            };

            match serde_json::from_str(&json) {
                Ok(configuration) => Ok(Some(configuration)),
                Err(e) => {
                    warn!(error = %e, "Ignoring unreadable mode record");
                    Ok(None)
                },
            }
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, configuration), fields(mode = %configuration.mode))]
    async fn save(&self, configuration: &ModeConfiguration) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let mode = configuration.mode.as_str();
        let json = serde_json::to_string(configuration).map_err(map_json_error)?;

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;

            conn.execute(
                "INSERT INTO mode_configuration (id, mode, config_json, updated_at)
                 VALUES (1, ?1, ?2, ?3)
                 ON CONFLICT(id) DO UPDATE SET
                    mode = excluded.mode,
                    config_json = excluded.config_json,
                    updated_at = excluded.updated_at",
                params![mode, json, Utc::now().to_rfc3339()],
            )
            .map_err(map_sqlite_error)?;

            debug!("Saved mode record");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
