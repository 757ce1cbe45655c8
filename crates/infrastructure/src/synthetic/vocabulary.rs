//! Word lists for plausible repository metadata and activity text

pub const ORGANIZATIONS: [&str; 6] = [
    "acme-corp",
    "northwind",
    "initech",
    "globex",
    "tidewater-labs",
    "helios-systems",
];

pub const REPOSITORY_PREFIXES: [&str; 14] = [
    "billing", "payments", "identity", "search", "catalog", "inventory", "notifications",
    "analytics", "checkout", "gateway", "scheduler", "reporting", "onboarding", "ledger",
];

pub const REPOSITORY_SUFFIXES: [&str; 8] = [
    "service", "api", "web", "worker", "sdk", "pipeline", "dashboard", "infra",
];

pub const LANGUAGES: [&str; 8] = [
    "Rust", "Go", "TypeScript", "Python", "Kotlin", "Java", "Ruby", "Elixir",
];

pub const DESCRIPTIONS: [&str; 6] = [
    "Core {} for the platform",
    "Internal {} maintained by the platform team",
    "Customer-facing {}",
    "{} with shared tooling and CI configuration",
    "Next generation {}",
    "Legacy {} scheduled for migration",
];

pub const COMMIT_VERBS: [&str; 10] = [
    "Fix", "Add", "Refactor", "Update", "Remove", "Improve", "Document", "Test", "Bump", "Simplify",
];

pub const COMPONENTS: [&str; 14] = [
    "retry logic",
    "auth middleware",
    "pagination",
    "cache invalidation",
    "webhook handler",
    "rate limiter",
    "config loader",
    "database migrations",
    "error messages",
    "feature flags",
    "metrics export",
    "input validation",
    "CI workflow",
    "dependency versions",
];

pub const PULL_REQUEST_PREFIXES: [&str; 5] = ["feat", "fix", "chore", "refactor", "perf"];

pub const ISSUE_TEMPLATES: [&str; 6] = [
    "{} fails under load",
    "Flaky test around {}",
    "Investigate slow {}",
    "Support configurable {}",
    "{} returns wrong status code",
    "Clean up {}",
];
