//! Dataset name value object

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::DomainError;

/// A validated dataset name
///
/// Names are 1-64 characters of ASCII letters, digits, `-`, `_` or `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Validate)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetName {
    #[validate(length(min = 1, max = 64))]
    value: String,
}

impl DatasetName {
    /// Name used when a synthetic mode is entered without an explicit dataset
    pub const DEFAULT: &'static str = "default";

    /// Create a dataset name, validating its format
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let candidate = Self {
            value: name.into().trim().to_string(),
        };
        candidate
            .validate()
            .map_err(|e| DomainError::validation(format!("Invalid dataset name: {e}")))?;

        if let Some(bad) = candidate
            .value
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(DomainError::validation(format!(
                "Invalid dataset name '{}': unexpected character '{bad}'",
                candidate.value
            )));
        }

        Ok(candidate)
    }

    /// The `"default"` dataset name
    #[must_use]
    pub fn default_name() -> Self {
        Self {
            value: Self::DEFAULT.to_string(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl TryFrom<String> for DatasetName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DatasetName> for String {
    fn from(name: DatasetName) -> Self {
        name.value
    }
}
