//! Value objects - Immutable objects defined by their attributes

mod activity_level;
mod application_mode;
mod dataset_name;
mod fault_kind;
mod identity_id;
mod time_window;

pub use activity_level::ActivityLevel;
pub use application_mode::ApplicationMode;
pub use dataset_name::DatasetName;
pub use fault_kind::FaultKind;
pub use identity_id::IdentityId;
pub use time_window::TimeWindow;
