//! Domain layer for teampulse
//!
//! Contains the synthetic environment's entities, value objects and domain
//! errors, plus the burnout and team-health heuristics that consume them.
//! This layer has no I/O and defines the ubiquitous language.

pub mod analytics;
pub mod entities;
pub mod errors;
pub mod value_objects;

pub use analytics::{BurnoutSignals, DatasetSummary, TeamHealth};
pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
