//! Synthetic identity entity and the fixed identity catalog

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ActivityLevel, IdentityId};

/// Typical working rhythm of a synthetic identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPattern {
    /// Office hours, weekdays
    Regular,
    /// Shifting hours with the occasional late evening
    Irregular,
    /// Long days, late nights and weekends
    Overworked,
}

impl fmt::Display for WorkPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Regular => "regular",
            Self::Irregular => "irregular",
            Self::Overworked => "overworked",
        };
        f.write_str(label)
    }
}

/// A synthetic developer identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticIdentity {
    pub id: IdentityId,
    pub handle: String,
    pub display_name: String,
    pub role: String,
    pub work_pattern: WorkPattern,
    pub activity_level: ActivityLevel,
    pub avatar_url: String,
}

impl SyntheticIdentity {
    fn catalog_entry(
        numeric_id: u32,
        handle: &str,
        display_name: &str,
        role: &str,
        work_pattern: WorkPattern,
        activity_level: ActivityLevel,
    ) -> Self {
        Self {
            id: IdentityId::new(numeric_id.to_string()),
            handle: handle.to_string(),
            display_name: display_name.to_string(),
            role: role.to_string(),
            work_pattern,
            activity_level,
            avatar_url: avatar_url(numeric_id),
        }
    }

    /// An additional contributor used when a dataset needs more identities
    /// than the catalog provides. Deterministic in `ordinal`.
    #[must_use]
    pub fn contributor(ordinal: u32) -> Self {
        let numeric_id = 2000 + ordinal;
        Self {
            id: IdentityId::new(numeric_id.to_string()),
            handle: format!("contributor-{ordinal}"),
            display_name: format!("Contributor {ordinal}"),
            role: "Software Engineer".to_string(),
            work_pattern: WorkPattern::Regular,
            activity_level: ActivityLevel::Medium,
            avatar_url: avatar_url(numeric_id),
        }
    }
}

fn avatar_url(numeric_id: u32) -> String {
    format!("https://avatars.githubusercontent.com/u/{numeric_id}?v=4")
}

/// The fixed catalog of synthetic identities, in presentation order
#[must_use]
pub fn identity_catalog() -> Vec<SyntheticIdentity> {
    use ActivityLevel::{High, Low, Medium};
    use WorkPattern::{Irregular, Overworked, Regular};

    let entries = [
        (1001, "alex-chen", "Alex Chen", "Senior Engineer", Overworked, High),
        (1002, "priya-patel", "Priya Patel", "Engineering Manager", Regular, Medium),
        (1003, "marcus-johnson", "Marcus Johnson", "Tech Lead", Overworked, High),
        (1004, "sofia-garcia", "Sofia Garcia", "Backend Engineer", Regular, Medium),
        (1005, "kenji-tanaka", "Kenji Tanaka", "Frontend Engineer", Irregular, Medium),
        (1006, "amara-okafor", "Amara Okafor", "DevOps Engineer", Irregular, High),
        (1007, "lena-schmidt", "Lena Schmidt", "Junior Engineer", Regular, Low),
        (1008, "diego-rossi", "Diego Rossi", "Staff Engineer", Regular, Low),
    ];

    entries
        .into_iter()
        .map(|(id, handle, name, role, pattern, level)| {
            SyntheticIdentity::catalog_entry(id, handle, name, role, pattern, level)
        })
        .collect()
}
