//! Domain entities - Objects with identity and lifecycle

mod activity;
mod dataset;
mod generation_parameters;
mod identity;
mod mode_configuration;
mod repository;
mod session;

pub use activity::{Commit, Issue, IssueState, PullRequest, PullRequestState, Review, ReviewState};
pub use dataset::{Dataset, DatasetCounts};
pub use generation_parameters::GenerationParameters;
pub use identity::{SyntheticIdentity, WorkPattern, identity_catalog};
pub use mode_configuration::{
    ErrorSimulation, FaultInjectionConfig, ModeConfiguration, ModeSwitchOptions,
};
pub use repository::Repository;
pub use session::{Session, SessionRole};
