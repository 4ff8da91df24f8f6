//! Fixed-window request throttling.
//!
//! Two guard variants share the same counting rule:
//!
//! - [`RateLimiter`]: one counter for every identity. A burst from a single
//!   identity consumes the allowance of all others. This is the classic
//!   login-throttle behavior and the default [`LimitScope`].
//! - [`PerIdentityRateLimiter`]: an independent counter per identity.
//!
//! # Counting rule
//!
//! Each call first checks whether more than one window length has elapsed
//! since the window started; if so the count resets to zero and the window
//! restarts at the current instant. The call is then counted, and rejected
//! if the count now exceeds the limit. Rejected calls are counted too.
//!
//! The shared limiter's first window starts when the guard is constructed,
//! not when the first request arrives.
//!
//! # Thread Safety
//!
//! The window check, increment and comparison run under a single mutex, so
//! concurrent callers can never both pass on a stale count.

use crate::{
    clock::{Clock, SystemClock},
    decision::{Decision, RejectionKind},
    error::ConfigError,
    guard::Guard,
    request::AdmissionRequest,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Window length used when none is configured.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Requests per window used when no limit is configured.
pub const DEFAULT_LIMIT: u32 = 60;

/// Whether a rate limit is shared by all identities or tracked per identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitScope {
    /// One counter shared by every identity
    #[default]
    Global,
    /// An independent counter per identity
    PerIdentity,
}

/// Declarative rate limit settings.
///
/// ```
/// use admission_core::{LimitScope, RateLimitConfig};
///
/// let config = RateLimitConfig {
///     limit: 2,
///     ..RateLimitConfig::default()
/// };
/// assert_eq!(config.window_ms, 60_000);
/// assert_eq!(config.scope, LimitScope::Global);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per window
    pub limit: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Shared or per-identity counting
    pub scope: LimitScope,
}

impl RateLimitConfig {
    /// The configured window as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Checks that the settings describe a usable limiter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroLimit`] or [`ConfigError::ZeroWindow`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_settings(self.limit, self.window())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            window_ms: DEFAULT_WINDOW.as_millis() as u64,
            scope: LimitScope::Global,
        }
    }
}

/// Builds the rate limit guard variant selected by `config.scope`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the limit or window is zero.
pub fn from_config(
    config: &RateLimitConfig,
    clock: Arc<dyn Clock>,
) -> Result<Box<dyn Guard>, ConfigError> {
    let guard: Box<dyn Guard> = match config.scope {
        LimitScope::Global => Box::new(RateLimiter::with_clock(
            config.limit,
            config.window(),
            clock,
        )?),
        LimitScope::PerIdentity => Box::new(PerIdentityRateLimiter::with_clock(
            config.limit,
            config.window(),
            clock,
        )?),
    };
    Ok(guard)
}

fn check_settings(limit: u32, window: Duration) -> Result<(), ConfigError> {
    if limit == 0 {
        return Err(ConfigError::ZeroLimit);
    }
    if window.is_zero() {
        return Err(ConfigError::ZeroWindow);
    }
    Ok(())
}

/// Counter for one fixed window.
#[derive(Debug, Clone, Copy)]
struct WindowCounter {
    window_start: Instant,
    count: u32,
}

impl WindowCounter {
    fn starting_at(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
        }
    }

    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.window_start) > window
    }

    /// Counts one call at `now` and returns the count including it.
    fn record(&mut self, now: Instant, window: Duration) -> u32 {
        if self.expired(now, window) {
            self.count = 0;
            self.window_start = now;
        }
        self.count = self.count.saturating_add(1);
        self.count
    }
}

fn decide(guard: &str, identity: &str, count: u32, limit: u32) -> Decision {
    if count > limit {
        tracing::warn!(
            guard = %guard,
            identity = %identity,
            count,
            limit,
            "rate limit exceeded"
        );
        Decision::reject(RejectionKind::RateLimited)
    } else {
        Decision::Admit
    }
}

/// Rate limit guard with one counter shared by every identity.
///
/// # Examples
///
/// ```
/// use admission_core::{AdmissionRequest, Guard, RateLimiter};
/// use std::time::Duration;
///
/// let limiter = RateLimiter::new(2, Duration::from_secs(60)).unwrap();
/// let alice = AdmissionRequest::new("alice", "pw");
/// let bob = AdmissionRequest::new("bob", "pw");
///
/// assert!(limiter.evaluate(&alice).is_admitting());
/// assert!(limiter.evaluate(&alice).is_admitting());
/// // Alice's burst also locks out Bob.
/// assert!(!limiter.evaluate(&bob).is_admitting());
/// ```
pub struct RateLimiter {
    name: String,
    limit: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<WindowCounter>,
}

impl RateLimiter {
    /// Creates a shared limiter allowing `limit` requests per `window`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `limit` or `window` is zero.
    pub fn new(limit: u32, window: Duration) -> Result<Self, ConfigError> {
        Self::with_clock(limit, window, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new) but reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `limit` or `window` is zero.
    pub fn with_clock(
        limit: u32,
        window: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        check_settings(limit, window)?;
        let state = Mutex::new(WindowCounter::starting_at(clock.now()));
        Ok(Self {
            name: "rate_limit".to_string(),
            limit,
            window,
            clock,
            state,
        })
    }

    /// Renames the guard, for chains with more than one limiter.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Maximum admitted requests per window.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests counted in the current window, including rejected ones.
    pub fn current_count(&self) -> u32 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }
}

impl Guard for RateLimiter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, request: &AdmissionRequest) -> Decision {
        let count = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.record(self.clock.now(), self.window)
        };
        decide(&self.name, request.identity(), count, self.limit)
    }
}

/// Number of evaluations between sweeps of idle identity counters.
const CLEANUP_INTERVAL: u64 = 100;

/// Rate limit guard with an independent counter per identity.
///
/// Each identity's first window starts at its first request. Counters whose
/// window has expired are swept every 100 evaluations so memory stays bounded
/// by the number of identities active within one window.
pub struct PerIdentityRateLimiter {
    name: String,
    limit: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    state: Mutex<HashMap<String, WindowCounter>>,
    evaluations: AtomicU64,
}

impl PerIdentityRateLimiter {
    /// Creates a per-identity limiter allowing `limit` requests per `window`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `limit` or `window` is zero.
    pub fn new(limit: u32, window: Duration) -> Result<Self, ConfigError> {
        Self::with_clock(limit, window, Arc::new(SystemClock))
    }

    /// Like [`new`](Self::new) but reading time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `limit` or `window` is zero.
    pub fn with_clock(
        limit: u32,
        window: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        check_settings(limit, window)?;
        Ok(Self {
            name: "per_identity_rate_limit".to_string(),
            limit,
            window,
            clock,
            state: Mutex::new(HashMap::new()),
            evaluations: AtomicU64::new(0),
        })
    }

    /// Renames the guard, for chains with more than one limiter.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of identities currently holding a counter.
    pub fn tracked_identities(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drops counters whose window has expired.
    pub fn cleanup(&self) {
        let now = self.clock.now();
        let window = self.window;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.retain(|_, counter| !counter.expired(now, window));
    }
}

impl Guard for PerIdentityRateLimiter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, request: &AdmissionRequest) -> Decision {
        let seen = self.evaluations.fetch_add(1, Ordering::Relaxed);
        if seen > 0 && seen % CLEANUP_INTERVAL == 0 {
            tracing::debug!(
                guard = %self.name,
                evaluations = seen,
                "sweeping idle rate limit counters"
            );
            self.cleanup();
        }

        let now = self.clock.now();
        let count = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state
                .entry(request.identity().to_string())
                .or_insert_with(|| WindowCounter::starting_at(now))
                .record(now, self.window)
        };
        decide(&self.name, request.identity(), count, self.limit)
    }
}
