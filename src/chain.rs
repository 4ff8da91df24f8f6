use crate::{
    decision::{Decision, RejectionKind},
    error::ConfigError,
    guard::Guard,
    request::AdmissionRequest,
};
use std::collections::HashSet;
use std::fmt;

/// The answer to one admission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the request was admitted
    pub admitted: bool,
    /// The rejecting guard's reason; empty when admitted
    pub reason: String,
    /// Guard that rejected the request or issued a final admission
    pub decided_by: Option<String>,
    /// `true` when a guard admitted with [`Decision::AdmitFinal`]
    pub final_grant: bool,
    kind: Option<RejectionKind>,
}

impl Verdict {
    fn granted(decided_by: Option<&str>, final_grant: bool) -> Self {
        Self {
            admitted: true,
            reason: String::new(),
            decided_by: decided_by.map(str::to_string),
            final_grant,
            kind: None,
        }
    }

    pub(crate) fn rejected(decided_by: Option<&str>, kind: RejectionKind, reason: String) -> Self {
        Self {
            admitted: false,
            reason,
            decided_by: decided_by.map(str::to_string),
            final_grant: false,
            kind: Some(kind),
        }
    }

    /// The category of the rejection, if the request was refused.
    pub fn rejection_kind(&self) -> Option<RejectionKind> {
        self.kind
    }
}

/// An ordered, immutable sequence of guards.
///
/// Guards are evaluated in the order they were added. Every guard runs until
/// one of them rejects (the request is refused) or issues
/// [`Decision::AdmitFinal`] (the request is admitted and later guards are
/// skipped). A request no guard objects to is admitted.
///
/// A chain is never modified after it is built; to reorder guards, build a
/// new chain. Share one chain between threads by wrapping it in an `Arc`.
///
/// # Examples
///
/// ```
/// use admission_core::{AdmissionRequest, Chain, RateLimiter, RoleGuard};
/// use std::time::Duration;
///
/// let chain = Chain::builder()
///     .guard(RoleGuard::for_identity("admin@example.com").unwrap())
///     .guard(RateLimiter::new(1, Duration::from_secs(60)).unwrap())
///     .build()
///     .expect("guard names are unique");
///
/// let user = AdmissionRequest::new("user@example.com", "pw");
/// assert!(chain.admit(&user).admitted);
/// assert_eq!(chain.admit(&user).reason, "rate limit exceeded");
///
/// // The role guard runs first, so the administrator skips the limiter.
/// let admin = AdmissionRequest::new("admin@example.com", "pw");
/// assert!(chain.admit(&admin).admitted);
/// ```
pub struct Chain {
    guards: Vec<Box<dyn Guard>>,
}

impl Chain {
    /// Starts building a chain.
    pub fn builder() -> ChainBuilder {
        ChainBuilder::new()
    }

    /// A chain without guards. It admits every request.
    pub fn empty() -> Self {
        Self { guards: Vec::new() }
    }

    /// Number of guards in the chain.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Returns `true` if the chain has no guards.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Guard names in evaluation order.
    pub fn guard_names(&self) -> impl Iterator<Item = &str> {
        self.guards.iter().map(|g| g.name())
    }

    /// Runs the request through the guards and returns the verdict.
    pub fn admit(&self, request: &AdmissionRequest) -> Verdict {
        let span = tracing::debug_span!("admission", identity = %request.identity());
        let _entered = span.enter();

        for guard in &self.guards {
            let decision = guard.evaluate(request);
            tracing::trace!(guard = %guard.name(), ?decision, "guard evaluated");

            match decision {
                Decision::Admit => continue,
                Decision::AdmitFinal => {
                    tracing::debug!(guard = %guard.name(), "admitted without remaining guards");
                    return Verdict::granted(Some(guard.name()), true);
                }
                Decision::Reject(rejection) => {
                    tracing::debug!(
                        guard = %guard.name(),
                        kind = %rejection.kind,
                        reason = %rejection.reason,
                        "admission rejected"
                    );
                    return Verdict::rejected(
                        Some(guard.name()),
                        rejection.kind,
                        rejection.reason,
                    );
                }
            }
        }

        Verdict::granted(None, false)
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.guard_names()).finish()
    }
}

/// Collects guards in evaluation order and validates them into a [`Chain`].
#[derive(Default)]
pub struct ChainBuilder {
    guards: Vec<Box<dyn Guard>>,
}

impl ChainBuilder {
    /// Creates a builder with no guards.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a guard after those already added.
    pub fn guard(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    /// Appends an already boxed guard.
    pub fn boxed(mut self, guard: Box<dyn Guard>) -> Self {
        self.guards.push(guard);
        self
    }

    /// Validates the guards and freezes them into a chain.
    ///
    /// An empty chain is valid and admits everything.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateGuardName`] if two guards share a name.
    pub fn build(self) -> Result<Chain, ConfigError> {
        let mut seen = HashSet::new();
        for guard in &self.guards {
            if !seen.insert(guard.name()) {
                return Err(ConfigError::DuplicateGuardName(guard.name().to_string()));
            }
        }

        if self.guards.is_empty() {
            tracing::warn!("admission chain has no guards; every request will be admitted");
        }

        Ok(Chain {
            guards: self.guards,
        })
    }
}

impl fmt::Debug for ChainBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.guards.iter().map(|g| g.name()))
            .finish()
    }
}
