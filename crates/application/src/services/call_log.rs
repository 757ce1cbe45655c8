//! Bounded log of intercepted hosting calls
//!
//! Records are retained in a ring buffer and also broadcast to subscribers
//! as they are written. A subscriber that falls behind by more than the log
//! capacity skips the oldest records.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use domain::{ApplicationMode, FaultKind};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// How an intercepted call ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CallOutcome {
    /// Answered with this many items
    Served { items: usize },
    /// Failed by the fault injector
    Faulted { kind: FaultKind },
    /// Failed for any other reason
    Failed { error: String },
}

/// One intercepted call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    pub at: DateTime<Utc>,
    pub mode: ApplicationMode,
    pub operation: String,
    pub resource: String,
    #[serde(flatten)]
    pub outcome: CallOutcome,
    pub duration_ms: u64,
}

#[derive(Debug, Default)]
struct Inner {
    records: VecDeque<CallRecord>,
    total: u64,
}

/// Ring buffer of the most recent [`CallRecord`]s
///
/// Once full, the oldest record is dropped for every new one.
#[derive(Debug)]
pub struct CallLog {
    capacity: usize,
    inner: Mutex<Inner>,
    notify: broadcast::Sender<CallRecord>,
}

impl CallLog {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a log keeping at most `capacity` records (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (notify, _) = broadcast::channel(capacity);
        Self {
            capacity,
            inner: Mutex::new(Inner {
                records: VecDeque::with_capacity(capacity),
                total: 0,
            }),
            notify,
        }
    }

    pub fn record(&self, record: CallRecord) {
        {
            let mut inner = self.inner.lock();
            if inner.records.len() == self.capacity {
                inner.records.pop_front();
            }
            inner.records.push_back(record.clone());
            inner.total += 1;
        }
        // No receivers is not an error
        let _ = self.notify.send(record);
    }

    /// Receive every record written from now on
    pub fn subscribe(&self) -> broadcast::Receiver<CallRecord> {
        self.notify.subscribe()
    }

    /// The last `limit` records, newest last
    pub fn recent(&self, limit: usize) -> Vec<CallRecord> {
        let inner = self.inner.lock();
        let skip = inner.records.len().saturating_sub(limit);
        inner.records.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().records.is_empty()
    }

    /// Records ever written, including evicted ones
    pub fn total_recorded(&self) -> u64 {
        self.inner.lock().total
    }

    /// Number of retained records that were failed by the fault injector
    pub fn faulted(&self) -> usize {
        self.inner
            .lock()
            .records
            .iter()
            .filter(|r| matches!(r.outcome, CallOutcome::Faulted { .. }))
            .count()
    }
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
