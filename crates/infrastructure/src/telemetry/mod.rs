//! Logging and tracing setup
//!
//! Console output through `tracing-subscriber`, human-readable or JSON.

mod logging;

pub use logging::{LoggingConfig, TelemetryError, init_tracing};
