//! In-memory audit trail recorder.

use super::AuditEvent;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Events kept by [`AuditTrail::new`] before the oldest are dropped.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// Thread-safe, bounded in-memory recorder for audit events.
///
/// A gateway shares one trail between every thread calling `admit`. Once
/// `capacity` events are held, recording a new one drops the oldest, so a
/// long-running gateway keeps only its most recent attempts. In production
/// you would typically forward events to persistent storage as well.
///
/// # Example
///
/// ```
/// use admission_core::audit::{AuditEvent, AuditTrail};
/// use admission_core::{AdmissionRequest, Chain};
///
/// let trail = AuditTrail::with_capacity(2);
/// let verdict = Chain::empty().admit(&AdmissionRequest::new("a", "b"));
///
/// for attempt in 1..=3 {
///     trail.record(AuditEvent::from_verdict(attempt, "a", &verdict));
/// }
///
/// assert_eq!(trail.len(), 2);
/// assert_eq!(trail.dropped(), 1);
/// assert_eq!(trail.events()[0].attempt(), 2);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    capacity: usize,
    state: Mutex<TrailState>,
}

#[derive(Debug, Default)]
struct TrailState {
    events: VecDeque<AuditEvent>,
    dropped: u64,
}

impl AuditTrail {
    /// Creates an empty trail holding up to [`DEFAULT_CAPACITY`] events.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty trail holding up to `capacity` events (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(TrailState::default()),
        }
    }

    /// Maximum number of events held at once.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an audit event, dropping the oldest one if the trail is full.
    pub fn record(&self, event: AuditEvent) {
        let mut state = self.lock();
        if state.events.len() == self.capacity {
            state.events.pop_front();
            state.dropped += 1;
        }
        state.events.push_back(event);
    }

    /// Returns a snapshot of the held events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.lock().events.iter().cloned().collect()
    }

    /// Returns the number of held events.
    pub fn len(&self) -> usize {
        self.lock().events.len()
    }

    /// Returns true if no events are held.
    pub fn is_empty(&self) -> bool {
        self.lock().events.is_empty()
    }

    /// Number of events dropped to stay within capacity.
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }

    /// Clears all held events and the drop count.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.events.clear();
        state.dropped = 0;
    }

    fn lock(&self) -> MutexGuard<'_, TrailState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}
