use crate::{
    audit::{AuditEvent, AuditTrail},
    chain::{Chain, Verdict},
    credential::Credential,
    decision::RejectionKind,
    request::AdmissionRequest,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// The front door of a service: runs each login attempt through the
/// currently installed [`Chain`].
///
/// The chain is handed in by the caller, so the same gateway can be wired
/// with different guard orderings. Installing a new chain replaces the
/// reference held by the gateway; calls already in flight finish on the chain
/// they started with.
///
/// # Examples
///
/// ```
/// use admission_core::{Chain, CredentialGuard, Gateway, InMemoryDirectory};
/// use std::sync::Arc;
///
/// let directory = Arc::new(InMemoryDirectory::new().with_identity("user@example.com", "user_pass"));
/// let chain = Chain::builder()
///     .guard(CredentialGuard::new(directory))
///     .build()
///     .unwrap();
///
/// let gateway = Gateway::with_chain(chain);
///
/// assert!(gateway.admit("user@example.com", "user_pass").admitted);
/// assert_eq!(gateway.admit("user@example.com", "nope").reason, "invalid credential");
/// ```
#[derive(Debug, Default)]
pub struct Gateway {
    chain: RwLock<Option<Arc<Chain>>>,
    audit: Option<Arc<AuditTrail>>,
    attempts: AtomicU64,
}

impl Gateway {
    /// Creates a gateway without a chain. It rejects until one is installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway running `chain`.
    pub fn with_chain(chain: impl Into<Arc<Chain>>) -> Self {
        let gateway = Self::new();
        gateway.install_chain(chain);
        gateway
    }

    /// Records every attempt to `trail`.
    ///
    /// The trail is bounded; see [`AuditTrail::with_capacity`].
    pub fn with_audit(mut self, trail: Arc<AuditTrail>) -> Self {
        self.audit = Some(trail);
        self
    }

    /// Replaces the chain used for subsequent attempts.
    pub fn install_chain(&self, chain: impl Into<Arc<Chain>>) {
        let chain = chain.into();
        tracing::info!(guards = ?chain, "installing admission chain");
        *self.chain.write().unwrap_or_else(PoisonError::into_inner) = Some(chain);
    }

    /// The chain currently in use.
    pub fn chain(&self) -> Option<Arc<Chain>> {
        self.chain
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Attempts admission for `identity` presenting `credential`.
    pub fn admit(&self, identity: &str, credential: impl Into<Credential>) -> Verdict {
        self.admit_request(&AdmissionRequest::new(identity, credential))
    }

    /// Attempts admission for a prepared request.
    pub fn admit_request(&self, request: &AdmissionRequest) -> Verdict {
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;

        let verdict = match self.chain() {
            Some(chain) => chain.admit(request),
            None => {
                tracing::warn!("admission attempted before a chain was installed");
                Verdict::rejected(
                    None,
                    RejectionKind::NoChain,
                    RejectionKind::NoChain.default_reason().to_string(),
                )
            }
        };

        if verdict.admitted {
            tracing::info!(
                attempt,
                identity = %request.identity(),
                privileged = verdict.final_grant,
                "admission granted"
            );
        }

        if let Some(trail) = &self.audit {
            let event = AuditEvent::from_verdict(attempt, request.identity(), &verdict);
            event.emit();
            trail.record(event);
        }

        verdict
    }

    /// Number of attempts handled so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}
