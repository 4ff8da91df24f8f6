use thiserror::Error;

/// Errors that can occur while assembling admission guards and chains.
///
/// Per-request outcomes are never errors; they are reported as
/// [`Decision`](crate::Decision) and [`Verdict`](crate::Verdict) values.
#[derive(Debug, Error)]
pub enum Error {
    /// A guard or chain was misconfigured
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// A configuration mistake detected when a guard or chain is constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A rate limiter was configured to allow zero requests per window
    #[error("rate limit must allow at least one request per window")]
    ZeroLimit,
    /// A rate limiter was configured with an empty window
    #[error("rate limit window must be longer than zero")]
    ZeroWindow,
    /// A role guard was built without any privileged identity
    #[error("role guard requires at least one privileged identity")]
    NoPrivilegedIdentities,
    /// A role guard was given an empty string as a privileged identity
    #[error("privileged identity must not be empty")]
    EmptyPrivilegedIdentity,
    /// Two guards in the same chain report the same name
    #[error("guard name '{0}' is used more than once in the chain")]
    DuplicateGuardName(String),
}
