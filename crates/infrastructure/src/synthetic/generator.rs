//! Synthetic dataset generator
//!
//! Builds a complete entity graph in one pass: repositories, contributors,
//! and per contributor a day-by-day series of commits, pull requests with
//! reviews, and issues. Burnout and collaboration patterns are layered on
//! top of the base activity rates when enabled.

use std::collections::{BTreeMap, HashMap, HashSet};

use application::{error::ApplicationError, ports::DatasetGeneratorPort};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc, Weekday};
use domain::{
    Commit, Dataset, DatasetName, GenerationParameters, IdentityId, Issue, IssueState,
    PullRequest, PullRequestState, Repository, Review, ReviewState, SyntheticIdentity, TimeWindow,
    WorkPattern, identity_catalog,
};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng, rngs::StdRng, seq::index};
use tracing::{debug, info, instrument};

use super::vocabulary::{
    COMMIT_VERBS, COMPONENTS, DESCRIPTIONS, ISSUE_TEMPLATES, LANGUAGES, ORGANIZATIONS,
    PULL_REQUEST_PREFIXES, REPOSITORY_PREFIXES, REPOSITORY_SUFFIXES,
};

/// Hours (UTC) used for late-night and early-morning work
const OFF_HOURS: [u32; 10] = [20, 21, 22, 23, 0, 1, 2, 5, 6, 7];

/// Probability that a bottleneck repository routes a review to its gatekeeper
const GATEKEEPER_REVIEW_PROBABILITY: f64 = 0.85;

/// Work rhythm of a contributor for the duration of one dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rhythm {
    /// Office hours, weekdays
    Steady,
    /// Wider spread of hours, some weekend work
    Irregular,
    /// Burnout pattern: off-hours and weekend work rising across the second
    /// half of the window, slow reviews
    AtRisk,
}

impl Rhythm {
    /// Strength of the burnout skew at `progress` (0.0 = window start, 1.0 = now)
    fn intensity(self, progress: f64) -> f64 {
        match self {
            Self::AtRisk if progress > 0.5 => ((progress - 0.5) * 2.0).min(1.0),
            _ => 0.0,
        }
    }

    fn off_hours_probability(self, intensity: f64) -> f64 {
        match self {
            Self::Steady => 0.04,
            Self::Irregular => 0.12,
            Self::AtRisk => 0.12 + 0.6 * intensity,
        }
    }

    /// Activity on Saturdays and Sundays relative to a weekday
    fn weekend_factor(self, intensity: f64) -> f64 {
        match self {
            Self::Steady => 0.08,
            Self::Irregular => 0.2,
            Self::AtRisk => 0.1 + 0.9 * intensity,
        }
    }

    fn review_delay_hours(self, rng: &mut StdRng, intensity: f64) -> f64 {
        match self {
            Self::Steady | Self::Irregular => rng.random_range(1.0..10.0),
            Self::AtRisk => 10.0 + 50.0 * intensity + rng.random_range(0.0..14.0),
        }
    }
}

/// Generator for synthetic datasets
///
/// Each generation draws its own RNG from a seed stream, so a generator built
/// with [`Self::with_seed`] produces the same sequence of datasets for the
/// same parameters and anchor time.
pub struct SyntheticDataGenerator {
    seeds: Mutex<StdRng>,
}

impl std::fmt::Debug for SyntheticDataGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticDataGenerator").finish_non_exhaustive()
    }
}

impl Default for SyntheticDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticDataGenerator {
    /// Generator seeded from the operating system
    pub fn new() -> Self {
        Self {
            seeds: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible generator
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seeds: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generate a dataset whose window ends at `now`
    #[instrument(skip(self, parameters), fields(dataset = %name))]
    pub fn generate_at(
        &self,
        name: &DatasetName,
        parameters: &GenerationParameters,
        now: DateTime<Utc>,
    ) -> Result<Dataset, ApplicationError> {
        parameters.check()?;

        let rng = StdRng::seed_from_u64(self.seeds.lock().random());
        let now = now.with_nanosecond(0).unwrap_or(now);
        let dataset = Builder::new(rng, parameters, now).build(name.clone());

        let counts = dataset.counts();
        info!(
            repositories = counts.repositories,
            identities = counts.identities,
            commits = counts.commits,
            pull_requests = counts.pull_requests,
            issues = counts.issues,
            "Synthetic dataset generated"
        );
        Ok(dataset)
    }
}

impl DatasetGeneratorPort for SyntheticDataGenerator {
    fn generate(
        &self,
        name: &DatasetName,
        parameters: &GenerationParameters,
    ) -> Result<Dataset, ApplicationError> {
        self.generate_at(name, parameters, Utc::now())
    }
}

/// Single-use state for one generation
struct Builder<'a> {
    rng: StdRng,
    parameters: &'a GenerationParameters,
    now: DateTime<Utc>,
    window: TimeWindow,
    /// Midnight of every calendar day touching the window, with its progress
    days: Vec<(DateTime<Utc>, f64)>,
}

impl<'a> Builder<'a> {
    fn new(rng: StdRng, parameters: &'a GenerationParameters, now: DateTime<Utc>) -> Self {
        let window = TimeWindow::last_days(now, parameters.time_range_days);
        let since = window.since();
        let span = (now - since).num_seconds().max(1) as f64;
        let first_midnight = since - Duration::seconds(i64::from(since.num_seconds_from_midnight()));

        let days = (0..=i64::from(parameters.time_range_days))
            .map(|offset| {
                let midnight = first_midnight + Duration::days(offset);
                let noon = midnight + Duration::hours(12);
                let progress = ((noon - since).num_seconds() as f64 / span).clamp(0.0, 1.0);
                (midnight, progress)
            })
            .collect();

        Self {
            rng,
            parameters,
            now,
            window,
            days,
        }
    }

    fn build(mut self, name: DatasetName) -> Dataset {
        let identities = identity_pool(self.parameters.users_per_repository);
        let repositories = self.repositories(&identities);
        let rhythms = self.rhythms(&identities, &repositories);

        let mut commits_by_repo = BTreeMap::new();
        let mut pull_requests_by_repo = BTreeMap::new();
        let mut issues_by_repo = BTreeMap::new();

        for (index, repository) in repositories.iter().enumerate() {
            let gatekeeper = (self.parameters.collaboration_patterns_enabled && index % 2 == 0)
                .then(|| repository.contributors.first())
                .flatten();

            let mut commits = Vec::new();
            let mut pull_requests = Vec::new();
            let mut issues = Vec::new();
            for author in &repository.contributors {
                let rhythm = rhythms.get(author).copied().unwrap_or(Rhythm::Steady);
                commits.extend(self.commits(repository, author, rhythm));
                pull_requests.extend(self.pull_requests(repository, author, &rhythms, gatekeeper));
                issues.extend(self.issues(repository, author, rhythm));
            }

            commits.sort_by_key(|c: &Commit| c.authored_at);
            number_items(&mut pull_requests, &mut issues);
            debug!(
                repository = %repository.full_name,
                bottleneck = gatekeeper.is_some(),
                commits = commits.len(),
                pull_requests = pull_requests.len(),
                "Repository activity generated"
            );

            commits_by_repo.insert(repository.full_name.clone(), commits);
            pull_requests_by_repo.insert(repository.full_name.clone(), pull_requests);
            issues_by_repo.insert(repository.full_name.clone(), issues);
        }

        Dataset {
            name,
            parameters: self.parameters.clone(),
            generated_at: self.now,
            identities,
            repositories,
            commits_by_repo,
            pull_requests_by_repo,
            issues_by_repo,
        }
    }

    fn repositories(&mut self, identities: &[SyntheticIdentity]) -> Vec<Repository> {
        let owner = pick(&mut self.rng, &ORGANIZATIONS);
        let count = self.parameters.repository_count;
        let users = (self.parameters.users_per_repository as usize).min(identities.len());

        let mut names = HashSet::new();
        let mut ids = HashSet::new();
        let mut repositories = Vec::with_capacity(count as usize);

        for ordinal in 1..=count {
            let prefix = pick(&mut self.rng, &REPOSITORY_PREFIXES);
            let suffix = pick(&mut self.rng, &REPOSITORY_SUFFIXES);
            let mut name = format!("{prefix}-{suffix}");
            if !names.insert(name.clone()) {
                name = format!("{prefix}-{suffix}-{ordinal}");
                names.insert(name.clone());
            }

            let id = loop {
                let candidate = self.rng.random_range(10_000_000..1_000_000_000_u64);
                if ids.insert(candidate) {
                    break candidate;
                }
            };

            let contributors = index::sample(&mut self.rng, identities.len(), users)
                .into_iter()
                .map(|i| identities[i].id.clone())
                .collect();

            let description = capitalize(&pick(&mut self.rng, &DESCRIPTIONS).replace("{}", suffix));
            let age_days = self.rng.random_range(30..1500);

            repositories.push(Repository {
                id,
                owner: owner.to_string(),
                full_name: format!("{owner}/{name}"),
                name,
                description: Some(description),
                language: Some(pick(&mut self.rng, &LANGUAGES).to_string()),
                default_branch: "main".to_string(),
                private: self.rng.random_bool(0.3),
                stars: self.rng.random_range(0..800),
                created_at: self.window.since() - Duration::days(age_days),
                contributors,
            });
        }

        repositories
    }

    /// Assign a rhythm to every identity
    ///
    /// With burnout patterns enabled, every active overworked identity is at
    /// risk, topped up at random to at least a third of the active identities.
    fn rhythms(
        &mut self,
        identities: &[SyntheticIdentity],
        repositories: &[Repository],
    ) -> HashMap<IdentityId, Rhythm> {
        let active: Vec<&SyntheticIdentity> = identities
            .iter()
            .filter(|i| repositories.iter().any(|r| r.has_contributor(&i.id)))
            .collect();

        let mut at_risk = HashSet::new();
        if self.parameters.burnout_patterns_enabled {
            at_risk.extend(
                active
                    .iter()
                    .filter(|i| i.work_pattern == WorkPattern::Overworked)
                    .map(|i| i.id.clone()),
            );

            let target = (active.len() / 3).max(1);
            let mut candidates: Vec<&IdentityId> = active
                .iter()
                .map(|i| &i.id)
                .filter(|id| !at_risk.contains(*id))
                .collect();
            while at_risk.len() < target && !candidates.is_empty() {
                let chosen = candidates.swap_remove(self.rng.random_range(0..candidates.len()));
                at_risk.insert(chosen.clone());
            }
            debug!(at_risk = at_risk.len(), active = active.len(), "Burnout subset chosen");
        }

        identities
            .iter()
            .map(|identity| {
                let rhythm = if at_risk.contains(&identity.id) {
                    Rhythm::AtRisk
                } else if identity.work_pattern == WorkPattern::Irregular {
                    Rhythm::Irregular
                } else {
                    Rhythm::Steady
                };
                (identity.id.clone(), rhythm)
            })
            .collect()
    }

    fn commits(&mut self, repository: &Repository, author: &IdentityId, rhythm: Rhythm) -> Vec<Commit> {
        let mut commits = Vec::new();
        let base_rate = self.parameters.activity_level.commits_per_day();

        for (midnight, progress) in self.days.clone() {
            let intensity = rhythm.intensity(progress);
            let rate = base_rate * day_factor(midnight, rhythm, intensity) * (1.0 + 0.5 * intensity);

            for _ in 0..draw_count(&mut self.rng, rate) {
                let authored_at = self.pick_time(midnight, rhythm, intensity);
                if !self.window.contains(authored_at) {
                    continue;
                }
                let message = format!(
                    "{} {}",
                    pick(&mut self.rng, &COMMIT_VERBS),
                    pick(&mut self.rng, &COMPONENTS)
                );
                commits.push(Commit {
                    sha: self.sha(),
                    repository: repository.full_name.clone(),
                    author: author.clone(),
                    message,
                    authored_at,
                    additions: self.rng.random_range(1..400),
                    deletions: self.rng.random_range(0..200),
                });
            }
        }

        commits
    }

    fn pull_requests(
        &mut self,
        repository: &Repository,
        author: &IdentityId,
        rhythms: &HashMap<IdentityId, Rhythm>,
        gatekeeper: Option<&IdentityId>,
    ) -> Vec<PullRequest> {
        let rhythm = rhythms.get(author).copied().unwrap_or(Rhythm::Steady);
        let base_rate = self.parameters.activity_level.pull_requests_per_day();
        let mut pull_requests = Vec::new();

        for (midnight, progress) in self.days.clone() {
            let intensity = rhythm.intensity(progress);
            let rate = base_rate * day_factor(midnight, rhythm, intensity);

            for _ in 0..draw_count(&mut self.rng, rate) {
                let created_at = self.pick_time(midnight, rhythm, intensity);
                if !self.window.contains(created_at) {
                    continue;
                }

                let mut reviews = Vec::new();
                for reviewer in self.pick_reviewers(repository, author, gatekeeper) {
                    let reviewer_rhythm = rhythms.get(&reviewer).copied().unwrap_or(Rhythm::Steady);
                    let delay = reviewer_rhythm
                        .review_delay_hours(&mut self.rng, reviewer_rhythm.intensity(progress));
                    let submitted_at = created_at + Duration::seconds((delay * 3600.0) as i64);
                    if submitted_at > self.now {
                        continue;
                    }
                    let state = pick(
                        &mut self.rng,
                        &[ReviewState::Approved, ReviewState::ChangesRequested, ReviewState::Commented],
                    );
                    reviews.push(Review {
                        reviewer,
                        state,
                        submitted_at,
                    });
                }
                reviews.sort_by_key(|r| r.submitted_at);

                let (state, merged_at, closed_at) = self.settle(created_at, &mut reviews);
                let title = format!(
                    "{}: {} {}",
                    pick(&mut self.rng, &PULL_REQUEST_PREFIXES),
                    pick(&mut self.rng, &COMMIT_VERBS).to_lowercase(),
                    pick(&mut self.rng, &COMPONENTS)
                );

                pull_requests.push(PullRequest {
                    number: 0,
                    repository: repository.full_name.clone(),
                    author: author.clone(),
                    title,
                    state,
                    created_at,
                    merged_at,
                    closed_at,
                    reviews,
                });
            }
        }

        pull_requests
    }

    /// Decide the final state of a pull request from its reviews
    fn settle(
        &mut self,
        created_at: DateTime<Utc>,
        reviews: &mut [Review],
    ) -> (PullRequestState, Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        if let Some(last) = reviews.last_mut() {
            if self.rng.random_bool(0.75) {
                last.state = ReviewState::Approved;
                let merged_at = last.submitted_at + Duration::minutes(self.rng.random_range(5..360));
                if merged_at <= self.now {
                    return (PullRequestState::Merged, Some(merged_at), Some(merged_at));
                }
            }
        }

        if self.rng.random_bool(0.08) {
            let closed_at = created_at + Duration::hours(self.rng.random_range(1..96));
            if closed_at <= self.now {
                return (PullRequestState::Closed, None, Some(closed_at));
            }
        }

        (PullRequestState::Open, None, None)
    }

    fn pick_reviewers(
        &mut self,
        repository: &Repository,
        author: &IdentityId,
        gatekeeper: Option<&IdentityId>,
    ) -> Vec<IdentityId> {
        let others: Vec<&IdentityId> = repository
            .contributors
            .iter()
            .filter(|c| *c != author)
            .collect();
        if others.is_empty() {
            return Vec::new();
        }

        match gatekeeper {
            Some(keeper) if keeper != author && self.rng.random_bool(GATEKEEPER_REVIEW_PROBABILITY) => {
                vec![keeper.clone()]
            },
            None if self.parameters.collaboration_patterns_enabled => {
                index::sample(&mut self.rng, others.len(), others.len().min(2))
                    .into_iter()
                    .map(|i| others[i].clone())
                    .collect()
            },
            _ => vec![pick(&mut self.rng, &others).clone()],
        }
    }

    fn issues(&mut self, repository: &Repository, author: &IdentityId, rhythm: Rhythm) -> Vec<Issue> {
        let base_rate = self.parameters.activity_level.issues_per_day();
        let mut issues = Vec::new();

        for (midnight, progress) in self.days.clone() {
            let intensity = rhythm.intensity(progress);
            let rate = base_rate * day_factor(midnight, rhythm, intensity);

            for _ in 0..draw_count(&mut self.rng, rate) {
                let created_at = self.pick_time(midnight, rhythm, intensity);
                if !self.window.contains(created_at) {
                    continue;
                }

                let assignee = self.rng.random_bool(0.8).then(|| {
                    let index = self.rng.random_range(0..repository.contributors.len());
                    repository.contributors[index].clone()
                });
                let closed_at = self
                    .rng
                    .random_bool(0.6)
                    .then(|| created_at + Duration::hours(self.rng.random_range(2..240)))
                    .filter(|closed_at| *closed_at <= self.now);
                let state = if closed_at.is_some() {
                    IssueState::Closed
                } else {
                    IssueState::Open
                };
                let title = capitalize(
                    &pick(&mut self.rng, &ISSUE_TEMPLATES).replace("{}", pick(&mut self.rng, &COMPONENTS)),
                );

                issues.push(Issue {
                    number: 0,
                    repository: repository.full_name.clone(),
                    author: author.clone(),
                    assignee,
                    title,
                    state,
                    created_at,
                    closed_at,
                });
            }
        }

        issues
    }

    fn pick_time(&mut self, midnight: DateTime<Utc>, rhythm: Rhythm, intensity: f64) -> DateTime<Utc> {
        let hour = if self.rng.random_bool(rhythm.off_hours_probability(intensity)) {
            pick(&mut self.rng, &OFF_HOURS)
        } else {
            match rhythm {
                Rhythm::Steady => 9 + self.rng.random_range(0..5) + self.rng.random_range(0..5),
                Rhythm::Irregular | Rhythm::AtRisk => self.rng.random_range(8..20),
            }
        };

        midnight
            + Duration::hours(i64::from(hour))
            + Duration::minutes(self.rng.random_range(0..60))
            + Duration::seconds(self.rng.random_range(0..60))
    }

    fn sha(&mut self) -> String {
        format!(
            "{:016x}{:016x}{:08x}",
            self.rng.random::<u64>(),
            self.rng.random::<u64>(),
            self.rng.random::<u32>()
        )
    }
}

/// The catalog, extended with numbered contributors when a repository needs
/// more distinct identities than the catalog holds
fn identity_pool(users_per_repository: u32) -> Vec<SyntheticIdentity> {
    let mut pool = identity_catalog();
    let catalog_size = u32::try_from(pool.len()).unwrap_or(u32::MAX);
    pool.extend((1..=users_per_repository.saturating_sub(catalog_size)).map(SyntheticIdentity::contributor));
    pool
}

fn day_factor(midnight: DateTime<Utc>, rhythm: Rhythm, intensity: f64) -> f64 {
    if matches!(midnight.weekday(), Weekday::Sat | Weekday::Sun) {
        rhythm.weekend_factor(intensity)
    } else {
        1.0
    }
}

/// Number of events for a day with mean `rate`
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn draw_count(rng: &mut StdRng, rate: f64) -> u32 {
    let whole = rate.floor().max(0.0);
    let extra = rng.random_bool((rate - whole).clamp(0.0, 1.0));
    whole as u32 + u32::from(extra)
}

/// Issue and pull request numbers share one sequence per repository, in
/// creation order
fn number_items(pull_requests: &mut [PullRequest], issues: &mut [Issue]) {
    pull_requests.sort_by_key(|pr| pr.created_at);
    issues.sort_by_key(|issue| issue.created_at);

    let (mut p, mut i, mut next) = (0, 0, 1_u64);
    while p < pull_requests.len() || i < issues.len() {
        let take_pull_request = i >= issues.len()
            || (p < pull_requests.len() && pull_requests[p].created_at <= issues[i].created_at);
        if take_pull_request {
            pull_requests[p].number = next;
            p += 1;
        } else {
            issues[i].number = next;
            i += 1;
        }
        next += 1;
    }
}

fn pick<T: Copy>(rng: &mut StdRng, items: &[T]) -> T {
    items[rng.random_range(0..items.len())]
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
