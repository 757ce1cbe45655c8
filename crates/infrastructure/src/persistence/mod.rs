//! Persistence module
//!
//! SQLite-based storage for the mode record, datasets and session identities.

pub mod connection;
pub mod dataset_store;
mod error;
pub mod migrations;
pub mod mode_store;
pub mod session_store;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use dataset_store::SqliteDatasetStore;
pub use mode_store::SqliteModeStore;
pub use session_store::SqliteSessionStore;
