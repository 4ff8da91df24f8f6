//! Audit records of admission attempts.
//!
//! This module provides:
//! - `AuditEvent`: what was decided for one attempt, and by which guard
//! - `AuditTrail`: thread-safe, bounded in-memory recorder
//!
//! Events hold only the identity, never the presented credential.

mod event;
mod trail;

pub use event::{AuditEvent, AuditOutcome};
pub use trail::{AuditTrail, DEFAULT_CAPACITY};
