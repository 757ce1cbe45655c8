//! Application services

mod call_log;
mod dataset_service;
mod identity_service;
mod mode_service;

pub use call_log::{CallLog, CallOutcome, CallRecord};
pub use dataset_service::{DatasetExport, DatasetService};
pub use identity_service::{IdentityListing, IdentityService};
pub use mode_service::{ModeChange, ModeController};
