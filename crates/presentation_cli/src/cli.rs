//! Command-line surface

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain::{ActivityLevel, ApplicationMode, FaultKind};

/// TeamPulse CLI
#[derive(Debug, Parser)]
#[command(name = "teampulse-cli")]
#[command(author, version, about = "TeamPulse synthetic environment CLI", long_about = None)]
pub struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file (extension optional)
    #[arg(short, long, env = "TEAMPULSE_CONFIG", default_value = "teampulse")]
    pub config: String,

    /// Session key for identity selection
    #[arg(short, long, default_value = "cli", global = true)]
    pub session: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show or switch the application mode
    Mode {
        #[command(subcommand)]
        action: ModeAction,
    },

    /// Manage synthetic datasets
    Dataset {
        #[command(subcommand)]
        action: DatasetAction,
    },

    /// Act as one of the synthetic identities
    Identity {
        #[command(subcommand)]
        action: IdentityAction,
    },

    /// Call the hosting API through the mode-aware client
    Fetch {
        /// Also print the intercepted calls and fault statistics
        #[arg(long, global = true)]
        trace: bool,

        #[command(subcommand)]
        action: FetchAction,
    },
}

#[derive(Debug, Subcommand)]
pub enum ModeAction {
    /// Print the active mode record
    Show,

    /// Replace the active mode record
    ///
    /// Example: teampulse-cli mode switch demo --dataset q3 --error-rate 0.1
    Switch {
        /// live, mock or demo
        mode: ApplicationMode,

        /// Dataset to serve in mock and demo mode
        #[arg(short, long)]
        dataset: Option<String>,

        /// Probability of a simulated upstream failure per call
        #[arg(long)]
        error_rate: Option<f64>,

        /// Restrict simulated failures to these kinds
        #[arg(long, value_delimiter = ',')]
        fault_kinds: Vec<FaultKind>,

        /// Feature flag to enable (repeatable)
        #[arg(long = "feature")]
        features: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum DatasetAction {
    /// List stored datasets in creation order
    List,

    /// Load a dataset, generating it with default parameters if missing
    Ensure { name: String },

    /// Regenerate a dataset, replacing any previous contents
    Reset {
        name: String,

        #[command(flatten)]
        overrides: GenerationOverrides,
    },

    /// Remove a dataset
    Delete { name: String },

    /// Write a dataset as JSON
    Export {
        name: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store a previously exported dataset under a name
    Import { name: String, file: PathBuf },

    /// Burnout and team-health summary of a dataset
    Stats { name: String },
}

/// Generation parameters that override the configured defaults
#[derive(Debug, Clone, Default, Args)]
pub struct GenerationOverrides {
    #[arg(long)]
    pub repositories: Option<u32>,

    #[arg(long)]
    pub users: Option<u32>,

    #[arg(long)]
    pub days: Option<u32>,

    #[arg(long)]
    pub activity: Option<ActivityLevel>,

    /// Disable burnout patterns
    #[arg(long)]
    pub no_burnout: bool,

    /// Disable collaboration patterns
    #[arg(long)]
    pub no_collaboration: bool,
}

impl GenerationOverrides {
    pub fn is_empty(&self) -> bool {
        self.repositories.is_none()
            && self.users.is_none()
            && self.days.is_none()
            && self.activity.is_none()
            && !self.no_burnout
            && !self.no_collaboration
    }
}

#[derive(Debug, Subcommand)]
pub enum IdentityAction {
    /// List catalog identities, marking the current one
    List,

    /// Act as the identity with this id
    Use { id: String },

    /// Issue a simulated session for the current identity
    Session,
}

#[derive(Debug, Subcommand)]
pub enum FetchAction {
    /// Repositories of an identity (current identity by default)
    Repos {
        #[arg(long)]
        identity: Option<String>,
    },

    /// Commits of a repository
    Commits {
        repository: String,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Pull requests of a repository
    Pulls {
        repository: String,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// Issues of a repository
    Issues {
        repository: String,

        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Debug, Clone, Copy, Args)]
pub struct WindowArgs {
    /// Look back this many days from now
    #[arg(long, default_value = "30")]
    pub days: u32,
}

/// Determine log filter level from verbosity count
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}
