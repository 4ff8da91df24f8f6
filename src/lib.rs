//! Admission pipelines built from independently pluggable guards.
//!
//! An incoming request carries an identity and a credential. A [`Chain`]
//! runs it through an ordered list of [`Guard`]s and produces a single
//! [`Verdict`]:
//! - every guard runs unless one rejects or grants final admission
//! - the first rejecting guard's reason is reported to the caller
//! - a chain nobody objects to admits the request
//!
//! # Core Types
//!
//! - [`AdmissionRequest`]: identity plus a redacted [`Credential`]
//! - [`Decision`]: a guard's `Admit` / `AdmitFinal` / `Reject` answer
//! - [`RateLimiter`] / [`PerIdentityRateLimiter`]: fixed-window throttling
//! - [`CredentialGuard`]: checks credentials against an [`IdentityDirectory`]
//! - [`RoleGuard`]: lets privileged identities skip the remaining guards
//! - [`Chain`]: immutable guard sequence and the evaluation algorithm
//! - [`Gateway`]: holds the installed chain and optionally audits attempts
//!
//! # Examples
//!
//! ```
//! use admission_core::{
//!     Chain, CredentialGuard, Gateway, InMemoryDirectory, RateLimiter, RoleGuard,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let directory = Arc::new(
//!     InMemoryDirectory::new()
//!         .with_identity("admin@example.com", "admin_pass")
//!         .with_identity("user@example.com", "user_pass"),
//! );
//!
//! let chain = Chain::builder()
//!     .guard(RateLimiter::new(2, Duration::from_secs(60)).unwrap())
//!     .guard(CredentialGuard::new(directory))
//!     .guard(RoleGuard::for_identity("admin@example.com").unwrap())
//!     .build()
//!     .expect("guard names are unique");
//!
//! let gateway = Gateway::with_chain(chain);
//!
//! let verdict = gateway.admit("admin@example.com", "admin_pass");
//! assert!(verdict.admitted && verdict.final_grant);
//!
//! let verdict = gateway.admit("user@example.com", "wrong");
//! assert_eq!(verdict.reason, "invalid credential");
//!
//! let verdict = gateway.admit("user@example.com", "user_pass");
//! assert_eq!(verdict.reason, "rate limit exceeded");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
mod chain;
mod clock;
mod credential;
mod credential_guard;
mod decision;
mod directory;
mod error;
mod gateway;
mod guard;
pub mod rate_limit;
mod request;
mod role_guard;

pub use chain::{Chain, ChainBuilder, Verdict};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::Credential;
pub use credential_guard::CredentialGuard;
pub use decision::{Decision, Rejection, RejectionKind};
pub use directory::{DirectoryError, IdentityDirectory, InMemoryDirectory};
pub use error::{ConfigError, Error};
pub use gateway::Gateway;
pub use guard::{FnGuard, Guard};
pub use rate_limit::{LimitScope, PerIdentityRateLimiter, RateLimitConfig, RateLimiter};
pub use request::AdmissionRequest;
pub use role_guard::{Privileged, RoleGuard};
