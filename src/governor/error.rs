use std::time::Duration;

use thiserror::Error;

use super::classify::FailureKind;

/// Typed result of a governed call that did not succeed
#[derive(Error, Debug)]
pub enum GovernorFailure<E> {
    /// Throttled on the final attempt
    #[error("Rate limited: {0}")]
    RateLimited(E),

    /// Failed on the final attempt for any other reason
    #[error("Request failed: {0}")]
    Transient(E),

    /// The dependency reported hard exhaustion; the cooldown is now active
    #[error("Quota exhausted: {0}")]
    QuotaExhaustedSignal(E),

    /// Short-circuited because a cooldown was already active
    #[error("Quota exhausted, try again in {}s", .retry_after.as_secs())]
    QuotaExhausted { retry_after: Duration },
}

impl<E> GovernorFailure<E> {
    pub(crate) fn from_kind(kind: FailureKind, error: E) -> Self {
        match kind {
            FailureKind::RateLimited => Self::RateLimited(error),
            FailureKind::Transient => Self::Transient(error),
            FailureKind::QuotaExhaustedSignal => Self::QuotaExhaustedSignal(error),
        }
    }

    /// Classification of the underlying failure, if an attempt was made
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            Self::RateLimited(_) => Some(FailureKind::RateLimited),
            Self::Transient(_) => Some(FailureKind::Transient),
            Self::QuotaExhaustedSignal(_) => Some(FailureKind::QuotaExhaustedSignal),
            Self::QuotaExhausted { .. } => None,
        }
    }

    /// True for both quota variants: callers should show "try again later"
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(
            self,
            Self::QuotaExhaustedSignal(_) | Self::QuotaExhausted { .. }
        )
    }

    /// The operation's own error, if one was produced
    pub fn into_inner(self) -> Option<E> {
        match self {
            Self::RateLimited(e) | Self::Transient(e) | Self::QuotaExhaustedSignal(e) => Some(e),
            Self::QuotaExhausted { .. } => None,
        }
    }
}
