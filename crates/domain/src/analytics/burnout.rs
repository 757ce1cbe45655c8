//! Burnout risk signals for a single identity

use chrono::{Datelike, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::entities::Dataset;
use crate::value_objects::IdentityId;

/// Hour (UTC) from which work counts as after hours
const EVENING_START_HOUR: u32 = 20;
/// Hour (UTC) before which work counts as after hours
const MORNING_END_HOUR: u32 = 8;

/// Activity signals correlated with burnout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnoutSignals {
    pub identity: IdentityId,
    pub commit_count: usize,
    /// Share of commits before 08:00 or from 20:00
    pub after_hours_share: f64,
    /// Share of commits on Saturday or Sunday
    pub weekend_share: f64,
    /// Off-hours share in the second half of the window minus the first half
    pub off_hours_trend: f64,
    /// Mean hours between a pull request opening and this identity's review
    pub review_response_hours: Option<f64>,
    /// Standard deviation of commit hour-of-day
    pub work_hour_stddev: f64,
}

impl BurnoutSignals {
    /// Collect the signals for `identity` from every repository in `dataset`
    #[must_use]
    pub fn for_identity(dataset: &Dataset, identity: &IdentityId) -> Self {
        let window = dataset.window();
        let midpoint = window.since() + (window.until() - window.since()) / 2;

        let commits: Vec<_> = dataset
            .all_commits()
            .filter(|c| &c.author == identity)
            .map(|c| c.authored_at)
            .collect();

        let is_off_hours = |t: &chrono::DateTime<chrono::Utc>| {
            is_after_hours(t.hour()) || is_weekend(t.weekday())
        };

        let after_hours_share = share(&commits, |t| is_after_hours(t.hour()));
        let weekend_share = share(&commits, |t| is_weekend(t.weekday()));

        let (first_half, second_half): (Vec<_>, Vec<_>) =
            commits.iter().copied().partition(|t| *t < midpoint);
        let off_hours_trend = share(&second_half, is_off_hours) - share(&first_half, is_off_hours);

        let response_hours: Vec<f64> = dataset
            .all_pull_requests()
            .flat_map(|pr| {
                pr.reviews
                    .iter()
                    .filter(|r| &r.reviewer == identity)
                    .map(move |r| (r.submitted_at - pr.created_at).num_seconds() as f64 / 3600.0)
            })
            .collect();
        let review_response_hours = mean(&response_hours);

        let hours: Vec<f64> = commits.iter().map(|t| f64::from(t.hour())).collect();
        let work_hour_stddev = stddev(&hours);

        Self {
            identity: identity.clone(),
            commit_count: commits.len(),
            after_hours_share,
            weekend_share,
            off_hours_trend,
            review_response_hours,
            work_hour_stddev,
        }
    }

    /// Weighted burnout risk score in `0.0..=100.0`
    #[must_use]
    pub fn risk_score(&self) -> f64 {
        if self.commit_count == 0 {
            return 0.0;
        }

        let after_hours = normalized(self.after_hours_share, 0.0, 0.4) * 30.0;
        let weekend = normalized(self.weekend_share, 0.05, 0.3) * 20.0;
        let trend = normalized(self.off_hours_trend, 0.0, 0.2) * 20.0;
        let response = self
            .review_response_hours
            .map_or(0.0, |h| normalized(h, 8.0, 48.0) * 15.0);
        let variance = normalized(self.work_hour_stddev, 2.5, 6.0) * 15.0;

        after_hours + weekend + trend + response + variance
    }
}

const fn is_after_hours(hour: u32) -> bool {
    hour < MORNING_END_HOUR || hour >= EVENING_START_HOUR
}

const fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

fn share<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> f64 {
    if items.is_empty() {
        return 0.0;
    }
    items.iter().filter(|item| predicate(item)).count() as f64 / items.len() as f64
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

fn stddev(values: &[f64]) -> f64 {
    let Some(mean) = mean(values) else {
        return 0.0;
    };
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Map `value` linearly from `[low, high]` onto `[0, 1]`, clamping outside
fn normalized(value: f64, low: f64, high: f64) -> f64 {
    ((value - low) / (high - low)).clamp(0.0, 1.0)
}
