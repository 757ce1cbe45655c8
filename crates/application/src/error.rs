//! Application-level errors
//!
//! This is also the upstream error taxonomy: the live hosting client and the
//! synthetic one both fail with these variants.

use domain::{DomainError, FaultKind};
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Connection-level failure talking to the upstream service
    #[error("Network error: {0}")]
    Network(String),

    /// Credentials missing, expired or rejected
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream service failed (5xx)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Operation not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Reading or writing persisted state failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Synthetic dataset generation failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Network(_) | Self::ExternalService(_)
        )
    }

    /// Whether the request was rejected by validation before any mutation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(DomainError::ValidationError(_)))
    }

    /// The error an upstream call fails with for the given fault kind
    ///
    /// Messages mirror what the hosting API reports for the real failure.
    pub fn from_fault_kind(kind: FaultKind, resource: &str) -> Self {
        match kind {
            FaultKind::RateLimitExceeded => Self::RateLimited,
            FaultKind::NetworkError => {
                Self::Network(format!("connection reset while requesting {resource}"))
            },
            FaultKind::AuthenticationError => Self::NotAuthorized("Bad credentials".to_string()),
            FaultKind::NotFound => Self::NotFound(resource.to_string()),
            FaultKind::ServerError => {
                Self::ExternalService(format!("502 Bad Gateway while requesting {resource}"))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(ApplicationError::RateLimited.is_retryable());
        assert!(ApplicationError::Network("reset".into()).is_retryable());
        assert!(ApplicationError::ExternalService("502".into()).is_retryable());
        assert!(!ApplicationError::NotFound("x".into()).is_retryable());
        assert!(!ApplicationError::NotAuthorized("x".into()).is_retryable());
    }

    #[test]
    fn validation_errors_are_recognised() {
        let err: ApplicationError = DomainError::validation("bad").into();
        assert!(err.is_validation());
        assert!(!ApplicationError::Internal("x".into()).is_validation());
    }

    #[test]
    fn every_fault_kind_maps_to_upstream_variant() {
        let mapped: Vec<_> = FaultKind::ALL
            .into_iter()
            .map(|kind| ApplicationError::from_fault_kind(kind, "acme/api"))
            .collect();
        assert!(matches!(mapped[0], ApplicationError::RateLimited));
        assert!(matches!(mapped[1], ApplicationError::Network(_)));
        assert!(matches!(mapped[2], ApplicationError::NotAuthorized(_)));
        assert!(matches!(mapped[3], ApplicationError::NotFound(ref r) if r == "acme/api"));
        assert!(matches!(mapped[4], ApplicationError::ExternalService(_)));
    }

    #[test]
    fn domain_errors_are_transparent() {
        let err: ApplicationError = DomainError::not_found("Dataset", "x").into();
        assert_eq!(err.to_string(), "Dataset not found: x");
    }
}
