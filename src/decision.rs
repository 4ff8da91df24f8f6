use std::fmt;

/// The outcome of a single guard evaluating a request.
///
/// - `Admit`: no objection, evaluation continues with the next guard
/// - `AdmitFinal`: unconditional approval, remaining guards are skipped
/// - `Reject`: evaluation stops and the request is refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No objection; defer to the remaining guards
    Admit,
    /// Grant admission without consulting the remaining guards
    AdmitFinal,
    /// Refuse admission
    Reject(Rejection),
}

impl Decision {
    /// Shorthand for a rejection of the given kind with its standard reason.
    pub fn reject(kind: RejectionKind) -> Self {
        Decision::Reject(Rejection::from(kind))
    }

    /// Shorthand for a custom rejection carrying a caller-supplied reason.
    pub fn reject_with(reason: impl Into<String>) -> Self {
        Decision::Reject(Rejection::new(RejectionKind::Custom, reason))
    }

    /// Returns `true` unless this is a rejection.
    pub fn is_admitting(&self) -> bool {
        !matches!(self, Decision::Reject(_))
    }
}

/// Why a guard refused a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// The category of the refusal
    pub kind: RejectionKind,
    /// Human-readable reason reported to the caller
    pub reason: String,
}

impl Rejection {
    /// Creates a rejection with an explicit reason.
    pub fn new(kind: RejectionKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<RejectionKind> for Rejection {
    fn from(kind: RejectionKind) -> Self {
        Self::new(kind, kind.default_reason())
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// The category of a [`Rejection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionKind {
    /// Too many requests in the current window
    RateLimited,
    /// The identity is not known to the directory
    UnknownIdentity,
    /// The identity exists but the credential does not match
    InvalidCredential,
    /// The identity directory could not answer
    DirectoryUnavailable,
    /// A gateway was asked to admit before any chain was installed
    NoChain,
    /// Rejected by a caller-defined guard
    Custom,
}

impl RejectionKind {
    /// The reason string reported when no more specific reason is given.
    pub fn default_reason(self) -> &'static str {
        match self {
            RejectionKind::RateLimited => "rate limit exceeded",
            RejectionKind::UnknownIdentity => "unknown identity",
            RejectionKind::InvalidCredential => "invalid credential",
            RejectionKind::DirectoryUnavailable => "identity directory unavailable",
            RejectionKind::NoChain => "no admission chain installed",
            RejectionKind::Custom => "rejected",
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionKind::RateLimited => write!(f, "rate_limited"),
            RejectionKind::UnknownIdentity => write!(f, "unknown_identity"),
            RejectionKind::InvalidCredential => write!(f, "invalid_credential"),
            RejectionKind::DirectoryUnavailable => write!(f, "directory_unavailable"),
            RejectionKind::NoChain => write!(f, "no_chain"),
            RejectionKind::Custom => write!(f, "custom"),
        }
    }
}
