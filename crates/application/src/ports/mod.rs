//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod dataset_generator;
mod dataset_store;
mod hosting_port;
mod mode_store;
mod session_store;

pub use dataset_generator::DatasetGeneratorPort;
#[cfg(test)]
pub use dataset_generator::MockDatasetGeneratorPort;
pub use dataset_store::DatasetStorePort;
#[cfg(test)]
pub use dataset_store::MockDatasetStorePort;
#[cfg(test)]
pub use hosting_port::MockHostingClientPort;
pub use hosting_port::{HostingClientPort, HostingOperation, HostingResponse};
#[cfg(test)]
pub use mode_store::MockModeStorePort;
pub use mode_store::ModeStorePort;
#[cfg(test)]
pub use session_store::MockSessionStorePort;
pub use session_store::SessionStorePort;
