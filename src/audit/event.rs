//! Audit event schema.

use crate::chain::Verdict;
use crate::decision::RejectionKind;
use std::fmt;

/// Outcome of an audited admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Admitted after every guard ran without objection
    Admitted,
    /// Admitted early by a guard issuing a final grant
    AdmittedFinal,
    /// Refused by a guard
    Rejected,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Admitted => write!(f, "admitted"),
            AuditOutcome::AdmittedFinal => write!(f, "admitted_final"),
            AuditOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// One admission attempt as seen by the audit trail.
///
/// # Example
///
/// ```
/// use admission_core::{AdmissionRequest, Chain};
/// use admission_core::audit::{AuditEvent, AuditOutcome};
///
/// let chain = Chain::empty();
/// let verdict = chain.admit(&AdmissionRequest::new("user@example.com", "pw"));
/// let event = AuditEvent::from_verdict(7, "user@example.com", &verdict);
///
/// assert_eq!(event.attempt(), 7);
/// assert_eq!(event.outcome(), AuditOutcome::Admitted);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    attempt: u64,
    identity: String,
    outcome: AuditOutcome,
    decided_by: Option<String>,
    rejection: Option<RejectionKind>,
    reason: String,
}

impl AuditEvent {
    /// Records `verdict` as attempt number `attempt` by `identity`.
    pub fn from_verdict(attempt: u64, identity: impl Into<String>, verdict: &Verdict) -> Self {
        let outcome = match (verdict.admitted, verdict.final_grant) {
            (true, true) => AuditOutcome::AdmittedFinal,
            (true, false) => AuditOutcome::Admitted,
            (false, _) => AuditOutcome::Rejected,
        };
        Self {
            attempt,
            identity: identity.into(),
            outcome,
            decided_by: verdict.decided_by.clone(),
            rejection: verdict.rejection_kind(),
            reason: verdict.reason.clone(),
        }
    }

    /// Sequence number assigned by the gateway.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// The identity that attempted admission.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// The guard that rejected or finally admitted, if any.
    pub fn decided_by(&self) -> Option<&str> {
        self.decided_by.as_deref()
    }

    /// Category of the rejection, for rejected attempts.
    pub fn rejection(&self) -> Option<RejectionKind> {
        self.rejection
    }

    /// Rejection reason; empty for admissions.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Emits the event as a structured log record under `admission_audit`.
    pub fn emit(&self) {
        tracing::info!(
            target: "admission_audit",
            attempt = self.attempt,
            identity = %self.identity,
            outcome = %self.outcome,
            decided_by = ?self.decided_by,
            rejection = ?self.rejection,
            reason = %self.reason,
            "admission audit event"
        );
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditEvent[attempt={}, identity={}, outcome={}",
            self.attempt, self.identity, self.outcome
        )?;

        if let Some(guard) = &self.decided_by {
            write!(f, ", guard={}", guard)?;
        }
        if !self.reason.is_empty() {
            write!(f, ", reason={}", self.reason)?;
        }

        write!(f, "]")
    }
}
