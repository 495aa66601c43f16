//! Resilient calls to the generative content service
//!
//! This module provides:
//! - Failure classification (rate limited, quota exhausted, transient)
//! - Retry with exponential backoff around any async unit of work
//! - A shared cooldown that short-circuits all callers after quota exhaustion

pub mod classify;
pub mod error;
pub mod executor;

pub use classify::{Classify, FailureKind, ServiceError};
pub use error::GovernorFailure;
pub use executor::{GovernorStatus, RequestGovernor};
