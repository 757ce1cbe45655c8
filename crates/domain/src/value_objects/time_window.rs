//! Time window value object

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// An inclusive time range `[since, until]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeWindow")]
pub struct TimeWindow {
    since: DateTime<Utc>,
    until: DateTime<Utc>,
}

/// Unchecked wire form of [`TimeWindow`]
#[derive(Deserialize)]
struct RawTimeWindow {
    since: DateTime<Utc>,
    until: DateTime<Utc>,
}

impl TryFrom<RawTimeWindow> for TimeWindow {
    type Error = DomainError;

    fn try_from(raw: RawTimeWindow) -> Result<Self, Self::Error> {
        Self::new(raw.since, raw.until)
    }
}

impl TimeWindow {
    /// Create a window, rejecting `since > until`
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self, DomainError> {
        if since > until {
            return Err(DomainError::validation(format!(
                "Time window start {since} is after its end {until}"
            )));
        }
        Ok(Self { since, until })
    }

    /// The `days` days leading up to `until`
    #[must_use]
    pub fn last_days(until: DateTime<Utc>, days: u32) -> Self {
        Self {
            since: until - Duration::days(i64::from(days)),
            until,
        }
    }

    /// A window covering all representable time
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            since: DateTime::<Utc>::MIN_UTC,
            until: DateTime::<Utc>::MAX_UTC,
        }
    }

    #[must_use]
    pub const fn since(&self) -> DateTime<Utc> {
        self.since
    }

    #[must_use]
    pub const fn until(&self) -> DateTime<Utc> {
        self.until
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.since <= instant && instant <= self.until
    }
}
