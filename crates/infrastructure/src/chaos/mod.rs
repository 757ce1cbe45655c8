//! Simulated upstream faults for synthetic modes.
//!
//! The chaos framework consists of:
//! - `FaultInjector`: decides per call whether to fail and with which kind
//! - `ChaosContext`: observational counters of calls and injected faults
//!
//! # Example
//!
//! ```ignore
//! use domain::{ErrorSimulation, FaultInjectionConfig};
//! use infrastructure::chaos::FaultInjector;
//!
//! let injector = FaultInjector::new();
//! let config = FaultInjectionConfig::from(&ErrorSimulation::with_rate(0.3));
//!
//! if let Some(kind) = injector.draw(&config) {
//!     return Err(ApplicationError::from_fault_kind(kind, "repos/acme/api/commits"));
//! }
//! ```

mod chaos_context;
mod fault_injector;

pub use chaos_context::{ChaosContext, ChaosStats};
pub use fault_injector::FaultInjector;
