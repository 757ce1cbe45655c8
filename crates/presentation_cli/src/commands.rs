//! Command handlers
//!
//! Each handler returns the text to print, so handlers can be exercised
//! without capturing stdout.

use std::fmt::Write as _;

use anyhow::{Context, bail};
use application::CallRecord;
use application::ports::HostingClientPort;
use chrono::Utc;
use domain::{
    Dataset, DatasetName, DatasetSummary, ErrorSimulation, GenerationParameters, IdentityId,
    ModeSwitchOptions, TimeWindow,
};
use infrastructure::ChaosStats;
use serde::Serialize;
use tokio::sync::broadcast::error::TryRecvError;
use tracing::debug;

use crate::app::App;
use crate::cli::{
    Commands, DatasetAction, FetchAction, GenerationOverrides, IdentityAction, ModeAction,
};

/// Run one command against a wired application
pub async fn run(app: &App, session: &str, command: Commands) -> anyhow::Result<String> {
    match command {
        Commands::Mode { action } => mode(app, action).await,
        Commands::Dataset { action } => dataset(app, action).await,
        Commands::Identity { action } => identity(app, session, action).await,
        Commands::Fetch { trace, action } => {
            if trace {
                traced_fetch(app, session, action).await
            } else {
                fetch(app, session, action).await
            }
        },
    }
}

async fn mode(app: &App, action: ModeAction) -> anyhow::Result<String> {
    match action {
        ModeAction::Show => {
            let active = app.modes.get_mode().await?;
            pretty(&*active)
        },

        ModeAction::Switch {
            mode,
            dataset,
            error_rate,
            fault_kinds,
            features,
        } => {
            let mut options = ModeSwitchOptions::default().with_features(features);
            if let Some(dataset) = dataset {
                options = options.with_dataset(dataset);
            }
            match error_rate {
                Some(rate) => {
                    options = options
                        .with_error_simulation(ErrorSimulation::with_rate(rate).with_kinds(fault_kinds));
                },
                None if !fault_kinds.is_empty() => bail!("--fault-kinds requires --error-rate"),
                None => {},
            }

            if !app.modes.switch_mode(mode, options).await? {
                let active = app.modes.get_mode().await?;
                bail!(
                    "Mode switch could not be persisted, {} mode remains active",
                    active.mode
                );
            }

            let active = app.modes.get_mode().await?;
            Ok(format!("✅ Switched to {} mode\n{}", active.mode, pretty(&*active)?))
        },
    }
}

async fn dataset(app: &App, action: DatasetAction) -> anyhow::Result<String> {
    match action {
        DatasetAction::List => {
            let names = app.datasets.list().await?;
            if names.is_empty() {
                return Ok("No datasets stored".to_string());
            }
            Ok(names
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"))
        },

        DatasetAction::Ensure { name } => {
            let dataset = app.datasets.get_or_create(&dataset_name(name)?).await?;
            Ok(describe(&dataset))
        },

        DatasetAction::Reset { name, overrides } => {
            let name = dataset_name(name)?;
            let parameters = if overrides.is_empty() {
                None
            } else {
                let base = app.datasets.get(&name).await?.map_or_else(
                    || app.datasets.default_parameters().clone(),
                    |existing| existing.parameters.clone(),
                );
                Some(apply_overrides(base, &overrides))
            };
            let dataset = app.datasets.upsert(&name, parameters).await?;
            Ok(format!("♻️  Regenerated\n{}", describe(&dataset)))
        },

        DatasetAction::Delete { name } => {
            let name = dataset_name(name)?;
            if !app.datasets.delete(&name).await? {
                bail!("Dataset not found: {name}");
            }
            Ok(format!("🗑️  Deleted {name}"))
        },

        DatasetAction::Export { name, output } => {
            let blob = app.datasets.export(&dataset_name(name)?).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &blob)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    Ok(format!("📦 Exported {} bytes to {}", blob.len(), path.display()))
                },
                None => Ok(String::from_utf8(blob)?),
            }
        },

        DatasetAction::Import { name, file } => {
            let blob = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let dataset = app.datasets.import(&dataset_name(name)?, &blob).await?;
            Ok(format!("📥 Imported\n{}", describe(&dataset)))
        },

        DatasetAction::Stats { name } => {
            let name = dataset_name(name)?;
            let Some(dataset) = app.datasets.get(&name).await? else {
                bail!("Dataset not found: {name}");
            };
            pretty(&DatasetSummary::for_dataset(&dataset))
        },
    }
}

async fn identity(app: &App, session: &str, action: IdentityAction) -> anyhow::Result<String> {
    match action {
        IdentityAction::List => {
            let mut out = String::new();
            for listing in app.identities.list_identities(session).await? {
                let marker = if listing.current { "*" } else { " " };
                let identity = listing.identity;
                let _ = writeln!(
                    out,
                    "{marker} {} {:<16} {} ({})",
                    identity.id, identity.handle, identity.display_name, identity.role
                );
            }
            Ok(out.trim_end().to_string())
        },

        IdentityAction::Use { id } => {
            let Some(identity) = app.identities.set_current(session, &IdentityId::new(id.clone())).await?
            else {
                bail!("Unknown identity: {id}");
            };
            Ok(format!("👤 Now acting as {} ({})", identity.display_name, identity.handle))
        },

        IdentityAction::Session => {
            let issued = app.identities.create_session(session).await?;
            pretty(&issued)
        },
    }
}

async fn fetch(app: &App, session: &str, action: FetchAction) -> anyhow::Result<String> {
    let window = |days: u32| TimeWindow::last_days(Utc::now(), days);

    match action {
        FetchAction::Repos { identity } => {
            let identity = match identity {
                Some(id) => IdentityId::new(id),
                None => app.identities.current_identity(session).await?.id,
            };
            pretty(&app.hosting.get_repositories(&identity).await?)
        },
        FetchAction::Commits { repository, window: args } => {
            pretty(&app.hosting.get_commits(&repository, &window(args.days)).await?)
        },
        FetchAction::Pulls { repository, window: args } => {
            pretty(&app.hosting.get_pull_requests(&repository, &window(args.days)).await?)
        },
        FetchAction::Issues { repository, window: args } => {
            pretty(&app.hosting.get_issues(&repository, &window(args.days)).await?)
        },
    }
}

/// Intercepted calls and fault counters observed around one fetch
#[derive(Debug, Serialize)]
struct CallTrace {
    calls: Vec<CallRecord>,
    faulted_in_log: usize,
    recorded_total: u64,
    chaos: ChaosStats,
}

async fn traced_fetch(app: &App, session: &str, action: FetchAction) -> anyhow::Result<String> {
    let log = app.hosting.calls();
    let mut receiver = log.subscribe();
    let result = fetch(app, session, action).await;

    let mut calls = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(record) => calls.push(record),
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "Trace missed call records"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    let trace = pretty(&CallTrace {
        calls,
        faulted_in_log: log.faulted(),
        recorded_total: log.total_recorded(),
        chaos: app.hosting.faults().stats(),
    })?;

    match result {
        Ok(output) => Ok(format!("{output}\n{trace}")),
        Err(e) => Err(e.context(trace)),
    }
}

fn dataset_name(name: String) -> anyhow::Result<DatasetName> {
    Ok(DatasetName::new(name)?)
}

fn apply_overrides(
    mut parameters: GenerationParameters,
    overrides: &GenerationOverrides,
) -> GenerationParameters {
    if let Some(repositories) = overrides.repositories {
        parameters.repository_count = repositories;
    }
    if let Some(users) = overrides.users {
        parameters.users_per_repository = users;
    }
    if let Some(days) = overrides.days {
        parameters.time_range_days = days;
    }
    if let Some(activity) = overrides.activity {
        parameters.activity_level = activity;
    }
    if overrides.no_burnout {
        parameters.burnout_patterns_enabled = false;
    }
    if overrides.no_collaboration {
        parameters.collaboration_patterns_enabled = false;
    }
    parameters
}

fn describe(dataset: &Dataset) -> String {
    let counts = dataset.counts();
    format!(
        "📊 {}: {} repositories, {} identities, {} commits, {} pull requests, {} issues (generated {})",
        dataset.name,
        counts.repositories,
        counts.identities,
        counts.commits,
        counts.pull_requests,
        counts.issues,
        dataset.generated_at.format("%Y-%m-%d %H:%M UTC")
    )
}

fn pretty<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
