//! Hosting API adapters
//!
//! The synthetic client, the live placeholder, and the interception layer
//! that picks between them per call.

mod hosting_factory;
mod request_interceptor;
mod synthetic_hosting;
mod unconfigured_hosting;

pub use hosting_factory::HostingClientFactory;
pub use request_interceptor::RequestInterceptor;
pub use synthetic_hosting::SyntheticHostingClient;
pub use unconfigured_hosting::UnconfiguredHostingClient;
