//! Request governor
//!
//! Guards one rate-limited dependency. Each call is retried with exponential
//! backoff; a quota exhaustion signal from any call starts a shared cooldown
//! during which every caller is turned away without touching the network.
//!
//! Dropping the future returned by [`RequestGovernor::execute`] cancels the
//! retry loop. Work already handed to the dependency is not recalled.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::classify::{Classify, FailureKind};
use super::error::GovernorFailure;
use crate::config::GovernorConfig;

/// Cooldown bookkeeping shared by every clone of a governor
#[derive(Debug, Default)]
struct GovernorState {
    quota_exhausted: bool,
    cooldown_ends_at: Option<Instant>,
    /// Wall-clock copy of `cooldown_ends_at` for status reporting
    cooldown_ends_at_utc: Option<DateTime<Utc>>,
    /// Bumped on every cooldown start so a replaced timer cannot clear a newer one
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl GovernorState {
    fn clear(&mut self) {
        self.quota_exhausted = false;
        self.cooldown_ends_at = None;
        self.cooldown_ends_at_utc = None;
        self.timer = None;
    }
}

/// Read-only snapshot for UI hints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernorStatus {
    pub quota_exhausted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown_ends_at: Option<DateTime<Utc>>,
}

/// Retry, backoff, and shared cooldown around one external dependency.
///
/// Cloning is cheap and clones share the cooldown state, so one governor
/// is built per dependency and handed to every caller.
#[derive(Clone)]
pub struct RequestGovernor {
    name: String,
    cooldown: Duration,
    max_retries: u32,
    initial_delay: Duration,
    state: Arc<Mutex<GovernorState>>,
}

impl fmt::Debug for RequestGovernor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestGovernor")
            .field("name", &self.name)
            .field("cooldown", &self.cooldown)
            .field("cooling_down", &self.is_cooling_down())
            .finish()
    }
}

impl RequestGovernor {
    /// Governor with the default retry settings and a custom cooldown window
    pub fn new(name: impl Into<String>, cooldown: Duration) -> Self {
        let mut governor = Self::from_config(name, &GovernorConfig::default());
        governor.cooldown = cooldown;
        governor
    }

    pub fn from_config(name: impl Into<String>, config: &GovernorConfig) -> Self {
        Self {
            name: name.into(),
            cooldown: config.cooldown(),
            max_retries: config.max_retries,
            initial_delay: config.initial_delay(),
            state: Arc::new(Mutex::new(GovernorState::default())),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, GovernorState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Time left on the active cooldown, if any
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        let mut state = self.lock_state();
        if !state.quota_exhausted {
            return None;
        }

        let now = Instant::now();
        match state.cooldown_ends_at {
            Some(ends_at) if ends_at > now => Some(ends_at - now),
            _ => {
                // Deadline passed before the timer task ran
                state.clear();
                None
            }
        }
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_remaining().is_some()
    }

    pub fn status(&self) -> GovernorStatus {
        let cooling_down = self.is_cooling_down();
        let state = self.lock_state();
        GovernorStatus {
            quota_exhausted: cooling_down,
            cooldown_ends_at: state.cooldown_ends_at_utc.filter(|_| cooling_down),
        }
    }

    /// Start the cooldown window, replacing any window already running.
    ///
    /// Safe to call from several callers at once; the last call wins and
    /// exactly one timer stays outstanding.
    pub fn start_cooldown(&self) {
        let mut state = self.lock_state();

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }

        state.generation += 1;
        let generation = state.generation;
        state.quota_exhausted = true;
        state.cooldown_ends_at = Some(Instant::now() + self.cooldown);
        state.cooldown_ends_at_utc = chrono::Duration::from_std(self.cooldown)
            .ok()
            .map(|window| Utc::now() + window);

        log::warn!(
            "{}: quota exhausted, cooling down for {}s",
            self.name,
            self.cooldown.as_secs()
        );

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let shared = Arc::clone(&self.state);
                let window = self.cooldown;
                let name = self.name.clone();
                state.timer = Some(handle.spawn(async move {
                    tokio::time::sleep(window).await;
                    let mut state = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    if state.generation == generation && state.quota_exhausted {
                        state.clear();
                        log::info!("{}: cooldown ended", name);
                    }
                }));
            }
            Err(_) => {
                log::debug!("{}: no async runtime, cooldown clears on its deadline", self.name);
            }
        }
    }

    /// Run `operation` with the configured retry count and initial delay
    pub async fn execute_default<T, E, F, Fut>(&self, operation: F) -> Result<T, GovernorFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
    {
        self.execute(operation, self.max_retries, self.initial_delay).await
    }

    /// Run `operation` up to `max_retries + 1` times.
    ///
    /// Returns `QuotaExhausted` without calling `operation` while a cooldown
    /// is active. Rate-limited and transient failures are retried after
    /// `initial_delay`, doubling each time. A quota exhaustion signal is
    /// never retried and starts the cooldown for every caller.
    pub async fn execute<T, E, F, Fut>(
        &self,
        mut operation: F,
        max_retries: u32,
        initial_delay: Duration,
    ) -> Result<T, GovernorFailure<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + fmt::Display,
    {
        let mut delay = initial_delay;
        let mut attempt: u32 = 0;

        loop {
            // Another caller may have started a cooldown while we were backing off
            if let Some(retry_after) = self.cooldown_remaining() {
                log::info!(
                    "{}: skipping request, cooldown active for another {}s",
                    self.name,
                    retry_after.as_secs()
                );
                return Err(GovernorFailure::QuotaExhausted { retry_after });
            }

            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let kind = error.classify();
            if kind == FailureKind::QuotaExhaustedSignal {
                self.start_cooldown();
                return Err(GovernorFailure::QuotaExhaustedSignal(error));
            }

            if attempt >= max_retries {
                log::warn!(
                    "{}: giving up after {} attempts: {}",
                    self.name,
                    attempt + 1,
                    error
                );
                return Err(GovernorFailure::from_kind(kind, error));
            }

            attempt += 1;
            log::info!(
                "{}: attempt {} of {} failed ({:?}). Retrying in {}ms... Error: {}",
                self.name,
                attempt,
                max_retries + 1,
                kind,
                delay.as_millis(),
                error
            );
            tokio::time::sleep(delay).await;
            delay = delay.saturating_mul(2);
        }
    }
}
