//! Mode controller - owns the active application mode record
//!
//! Reads are lock-free through an [`ArcSwapOption`]; switches are serialized
//! and replace the whole record, so observers never see a mode/dataset
//! combination that no completed switch produced.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use domain::{ApplicationMode, ModeConfiguration, ModeSwitchOptions};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use crate::{error::ApplicationError, ports::ModeStorePort};

/// Notification published after every effective mode switch
#[derive(Debug, Clone, PartialEq)]
pub struct ModeChange {
    /// Monotonic switch counter; 0 is the initial value before any switch
    pub sequence: u64,
    pub previous: Option<ApplicationMode>,
    pub configuration: Arc<ModeConfiguration>,
}

/// Controller for the process-wide [`ModeConfiguration`]
pub struct ModeController {
    store: Arc<dyn ModeStorePort>,
    defaults: ModeConfiguration,
    current: ArcSwapOption<ModeConfiguration>,
    switch_lock: Mutex<()>,
    notify: watch::Sender<ModeChange>,
}

impl std::fmt::Debug for ModeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeController")
            .field("defaults", &self.defaults)
            .field("current", &self.current.load_full())
            .finish_non_exhaustive()
    }
}

impl ModeController {
    /// Create a controller
    ///
    /// `defaults` is used only on a cold start, when no record has been
    /// persisted yet. Once a record exists it always wins.
    pub fn new(store: Arc<dyn ModeStorePort>, defaults: ModeConfiguration) -> Self {
        let (notify, _) = watch::channel(ModeChange {
            sequence: 0,
            previous: None,
            configuration: Arc::new(defaults.clone()),
        });
        Self {
            store,
            defaults,
            current: ArcSwapOption::empty(),
            switch_lock: Mutex::new(()),
            notify,
        }
    }

    /// Get the active mode record
    #[instrument(skip(self))]
    pub async fn get_mode(&self) -> Result<Arc<ModeConfiguration>, ApplicationError> {
        if let Some(current) = self.current.load_full() {
            return Ok(current);
        }

        let _guard = self.switch_lock.lock().await;
        self.load_locked().await
    }

    /// Whether a feature flag is set on the active record
    pub async fn is_feature_enabled(&self, feature: &str) -> Result<bool, ApplicationError> {
        Ok(self.get_mode().await?.is_feature_enabled(feature))
    }

    /// Switch to a new mode
    ///
    /// Returns `Ok(true)` when the new record is active (including the no-op
    /// case of switching to an identical record) and `Ok(false)` when the
    /// record could not be persisted, in which case the previous record stays
    /// active. Invalid options are rejected before anything is touched.
    #[instrument(skip(self, options), fields(mode = %mode))]
    pub async fn switch_mode(
        &self,
        mode: ApplicationMode,
        options: ModeSwitchOptions,
    ) -> Result<bool, ApplicationError> {
        let replacement = ModeConfiguration::build(mode, options)?;

        let _guard = self.switch_lock.lock().await;
        let previous = self.load_locked().await?;

        if *previous == replacement {
            debug!("Mode unchanged, skipping switch");
            return Ok(true);
        }

        if let Err(e) = self.store.save(&replacement).await {
            warn!(error = %e, "Failed to persist mode switch, keeping previous mode");
            return Ok(false);
        }

        let replacement = Arc::new(replacement);
        self.current.store(Some(Arc::clone(&replacement)));

        info!(
            from = %previous.mode,
            to = %replacement.mode,
            dataset = replacement.dataset_id.as_ref().map(ToString::to_string),
            error_simulation = replacement.error_simulation.enabled,
            "Application mode switched"
        );

        self.notify.send_modify(|change| {
            change.sequence += 1;
            change.previous = Some(previous.mode);
            change.configuration = Arc::clone(&replacement);
        });

        Ok(true)
    }

    /// Subscribe to mode-changed notifications
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ModeChange> {
        self.notify.subscribe()
    }

    /// Resolve the current record; the caller holds `switch_lock`
    async fn load_locked(&self) -> Result<Arc<ModeConfiguration>, ApplicationError> {
        if let Some(current) = self.current.load_full() {
            return Ok(current);
        }

        let loaded = match self.store.load().await? {
            Some(persisted) => match persisted.validate() {
                Ok(()) => persisted,
                Err(e) => {
                    warn!(error = %e, "Persisted mode record is invalid, using defaults");
                    self.defaults.clone()
                },
            },
            None => {
                debug!(mode = %self.defaults.mode, "No persisted mode, using configured defaults");
                self.defaults.clone()
            },
        };

        let loaded = Arc::new(loaded);
        self.current.store(Some(Arc::clone(&loaded)));
        Ok(loaded)
    }
}
