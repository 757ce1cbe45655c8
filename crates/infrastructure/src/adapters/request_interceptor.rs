//! Request interception layer
//!
//! Every hosting call goes through [`RequestInterceptor::dispatch`], which
//! reads the active mode record for that call:
//!
//! - live mode forwards the call to the live client unchanged
//! - synthetic modes first ask the fault injector, then answer from the
//!   mode's dataset
//!
//! A simulated fault is returned before the dataset is resolved, so a faulted
//! call never touches the dataset store. Every call is recorded in the
//! [`CallLog`].

use std::sync::Arc;
use std::time::Instant;

use application::{
    CallLog, CallOutcome, CallRecord, ModeController,
    error::ApplicationError,
    ports::{HostingClientPort, HostingOperation, HostingResponse},
};
use async_trait::async_trait;
use chrono::Utc;
use domain::{Commit, IdentityId, Issue, ModeConfiguration, PullRequest, Repository, TimeWindow};
use tracing::{debug, instrument, warn};

use super::HostingClientFactory;
use crate::chaos::FaultInjector;

/// Mode-aware front for the hosting API
pub struct RequestInterceptor {
    modes: Arc<ModeController>,
    clients: HostingClientFactory,
    faults: Arc<FaultInjector>,
    calls: Arc<CallLog>,
}

impl std::fmt::Debug for RequestInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestInterceptor")
            .field("clients", &self.clients)
            .field("calls", &self.calls.len())
            .finish_non_exhaustive()
    }
}

impl RequestInterceptor {
    pub fn new(
        modes: Arc<ModeController>,
        clients: HostingClientFactory,
        faults: Arc<FaultInjector>,
        calls: Arc<CallLog>,
    ) -> Self {
        Self {
            modes,
            clients,
            faults,
            calls,
        }
    }

    pub fn calls(&self) -> &Arc<CallLog> {
        &self.calls
    }

    pub fn faults(&self) -> &Arc<FaultInjector> {
        &self.faults
    }

    /// Route one hosting call according to the current mode
    #[instrument(skip(self), fields(operation = operation.name()))]
    pub async fn dispatch(
        &self,
        operation: &HostingOperation,
    ) -> Result<HostingResponse, ApplicationError> {
        let started = Instant::now();
        let configuration = self.modes.get_mode().await?;

        let fault = if configuration.mode.is_synthetic() {
            self.faults.draw(&configuration.fault_injection())
        } else {
            None
        };

        let result = match fault {
            Some(kind) => Err(ApplicationError::from_fault_kind(kind, &operation.resource())),
            None => self.forward(&configuration, operation).await,
        };

        let outcome = match (&result, fault) {
            (_, Some(kind)) => CallOutcome::Faulted { kind },
            (Ok(response), None) => CallOutcome::Served {
                items: response.len(),
            },
            (Err(e), None) => {
                warn!(error = %e, mode = %configuration.mode, "Hosting call failed");
                CallOutcome::Failed {
                    error: e.to_string(),
                }
            },
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        debug!(mode = %configuration.mode, ?outcome, duration_ms, "Hosting call intercepted");
        self.calls.record(CallRecord {
            at: Utc::now(),
            mode: configuration.mode,
            operation: operation.name().to_string(),
            resource: operation.resource(),
            outcome,
            duration_ms,
        });

        result
    }

    async fn forward(
        &self,
        configuration: &ModeConfiguration,
        operation: &HostingOperation,
    ) -> Result<HostingResponse, ApplicationError> {
        let client = self.clients.client_for(configuration).await?;
        operation.execute(client.as_ref()).await
    }
}

fn unexpected(operation: &HostingOperation) -> ApplicationError {
    ApplicationError::Internal(format!(
        "Mismatched response for {}",
        operation.name()
    ))
}

#[async_trait]
impl HostingClientPort for RequestInterceptor {
    async fn get_repositories(
        &self,
        identity: &IdentityId,
    ) -> Result<Vec<Repository>, ApplicationError> {
        let operation = HostingOperation::Repositories {
            identity: identity.clone(),
        };
        let HostingResponse::Repositories(items) = self.dispatch(&operation).await? else {
            return Err(unexpected(&operation));
        };
        Ok(items)
    }

    async fn get_commits(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Commit>, ApplicationError> {
        let operation = HostingOperation::Commits {
            repository: repository.to_string(),
            window: *window,
        };
        let HostingResponse::Commits(items) = self.dispatch(&operation).await? else {
            return Err(unexpected(&operation));
        };
        Ok(items)
    }

    async fn get_pull_requests(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<PullRequest>, ApplicationError> {
        let operation = HostingOperation::PullRequests {
            repository: repository.to_string(),
            window: *window,
        };
        let HostingResponse::PullRequests(items) = self.dispatch(&operation).await? else {
            return Err(unexpected(&operation));
        };
        Ok(items)
    }

    async fn get_issues(
        &self,
        repository: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Issue>, ApplicationError> {
        let operation = HostingOperation::Issues {
            repository: repository.to_string(),
            window: *window,
        };
        let HostingResponse::Issues(items) = self.dispatch(&operation).await? else {
            return Err(unexpected(&operation));
        };
        Ok(items)
    }
}
