//! SQLite session identity store
//!
//! Implements the `SessionStorePort`: which synthetic identity each session
//! acts as.

use std::sync::Arc;

use application::{error::ApplicationError, ports::SessionStorePort};
use async_trait::async_trait;
use chrono::Utc;
use domain::IdentityId;
use rusqlite::params;
use tokio::task;
use tracing::{debug, instrument};

use super::{
    connection::ConnectionPool,
    error::{OptionalExt, map_join_error, map_pool_error, map_sqlite_error},
};

/// SQLite-based session identity store
#[derive(Debug, Clone)]
pub struct SqliteSessionStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteSessionStore {
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStorePort for SqliteSessionStore {
    #[instrument(skip(self))]
    async fn current_identity(&self, session: &str) -> Result<Option<IdentityId>, ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let session = session.to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let identity: Option<String> = conn
                .query_row(
                    "SELECT identity_id FROM session_identities WHERE session_key = ?1",
                    [&session],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_sqlite_error)?;
            Ok(identity.map(IdentityId::new))
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self), fields(identity = %identity))]
    async fn set_current_identity(
        &self,
        session: &str,
        identity: &IdentityId,
    ) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let session = session.to_string();
        let identity = identity.to_string();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            conn.execute(
                "INSERT INTO session_identities (session_key, identity_id, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(session_key) DO UPDATE SET
                    identity_id = excluded.identity_id,
                    updated_at = excluded.updated_at",
                params![session, identity, Utc::now().to_rfc3339()],
            )
            .map_err(map_sqlite_error)?;

            debug!("Saved session identity");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
