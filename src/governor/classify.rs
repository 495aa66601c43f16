use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the governor treats a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    /// Throttled, but the dependency has capacity later. Retried.
    RateLimited,
    /// Hard quota or billing exhaustion. Never retried; starts the cooldown.
    QuotaExhaustedSignal,
    /// Anything else (network error, malformed response). Retried.
    Transient,
}

/// Errors returned by a governed operation report their own kind
pub trait Classify {
    fn classify(&self) -> FailureKind;
}

/// Error from the generative content service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("content service error (status {status:?}): {message}")]
pub struct ServiceError {
    /// HTTP status, if the failure came with one
    pub status: Option<u16>,
    pub message: String,
}

impl ServiceError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// A failure with no status, e.g. a dropped connection or unparseable body
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

impl Classify for ServiceError {
    fn classify(&self) -> FailureKind {
        let message = self.message.to_lowercase();
        let mentions_quota = message.contains("quota") || message.contains("billing");
        let resource_exhausted = message.contains("resource_exhausted");

        match self.status {
            Some(429) if mentions_quota => FailureKind::QuotaExhaustedSignal,
            Some(429) | Some(503) => FailureKind::RateLimited,
            _ if resource_exhausted && mentions_quota => FailureKind::QuotaExhaustedSignal,
            _ if resource_exhausted => FailureKind::RateLimited,
            _ => FailureKind::Transient,
        }
    }
}
