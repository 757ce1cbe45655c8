//! Database migrations
//!
//! Manages database schema versioning and migrations. The schema is embedded
//! here and applied in order on startup.
//!
//! ## Adding New Migrations
//!
//! 1. Increment `SCHEMA_VERSION`
//! 2. Add a new `migrate_vX` function
//! 3. Update `run_migrations` to call the new function

use rusqlite::Connection;
use tracing::{debug, error, info};

use super::connection::DatabaseError;

/// Current schema version
const SCHEMA_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current_version = get_schema_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        debug!(version = current_version, "Database schema is up to date");
        return Ok(());
    }

    info!(
        from_version = current_version,
        to_version = SCHEMA_VERSION,
        "Running database migrations"
    );

    if current_version < 1 {
        if let Err(e) = migrate_v1(conn) {
            error!(version = 1, error = %e, "Migration V001 (mode record and datasets) failed");
            return Err(e);
        }
    }

    if current_version < 2 {
        if let Err(e) = migrate_v2(conn) {
            error!(version = 2, error = %e, "Migration V002 (session identities) failed");
            return Err(e);
        }
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Database migrations complete");
    Ok(())
}

/// Get current schema version
fn get_schema_version(conn: &Connection) -> Result<i32, DatabaseError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration to version 1: mode record and datasets
fn migrate_v1(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V001: mode record and datasets");

    conn.execute_batch(
        "
        -- The single active mode record
        CREATE TABLE IF NOT EXISTS mode_configuration (
            id INTEGER PRIMARY KEY CHECK(id = 1),
            mode TEXT NOT NULL CHECK(mode IN ('live', 'mock', 'demo')),
            config_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Named synthetic datasets, stored as whole graphs
        CREATE TABLE IF NOT EXISTS datasets (
            name TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            parameters_json TEXT NOT NULL,
            graph_json TEXT NOT NULL,
            generated_at TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_datasets_position ON datasets(position);
        ",
    )?;

    Ok(())
}

/// Migration to version 2: per-session identity selection
fn migrate_v2(conn: &Connection) -> Result<(), DatabaseError> {
    debug!("Applying migration V002: session identities");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS session_identities (
            session_key TEXT PRIMARY KEY,
            identity_id TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}
