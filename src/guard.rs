//! The uniform contract every admission check implements.

use crate::{decision::Decision, request::AdmissionRequest};
use std::fmt;

/// A single admission check.
///
/// Guards may keep private state (for example request counters) and mutate it
/// during [`evaluate`](Guard::evaluate), but they never modify the request or
/// any other guard. Every outcome, including "cannot decide", is a
/// [`Decision`]; guards do not panic or return errors for control flow.
///
/// A guard that does not apply to a request returns [`Decision::Admit`] so
/// the remaining guards still run.
pub trait Guard: Send + Sync {
    /// Name reported when this guard rejects or finally admits a request.
    ///
    /// Must be unique within a chain.
    fn name(&self) -> &str;

    /// Evaluates the request against this guard.
    fn evaluate(&self, request: &AdmissionRequest) -> Decision;
}

impl<G: Guard + ?Sized> Guard for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn evaluate(&self, request: &AdmissionRequest) -> Decision {
        (**self).evaluate(request)
    }
}

/// A caller-defined guard backed by a closure.
///
/// # Examples
///
/// ```
/// use admission_core::{AdmissionRequest, Decision, FnGuard, Guard};
///
/// let no_guests = FnGuard::new("no_guests", |request: &AdmissionRequest| {
///     if request.identity().starts_with("guest") {
///         Decision::reject_with("guest access disabled")
///     } else {
///         Decision::Admit
///     }
/// });
///
/// let request = AdmissionRequest::new("guest-1", "pw");
/// assert!(!no_guests.evaluate(&request).is_admitting());
/// ```
pub struct FnGuard<F> {
    name: String,
    check: F,
}

impl<F> FnGuard<F>
where
    F: Fn(&AdmissionRequest) -> Decision + Send + Sync,
{
    /// Wraps `check` as a guard called `name`.
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

impl<F> Guard for FnGuard<F>
where
    F: Fn(&AdmissionRequest) -> Decision + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, request: &AdmissionRequest) -> Decision {
        (self.check)(request)
    }
}

impl<F> fmt::Debug for FnGuard<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnGuard").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_guard_reports_name_and_decision() {
        let guard = FnGuard::new("always_final", |_: &AdmissionRequest| Decision::AdmitFinal);
        let request = AdmissionRequest::new("a", "b");

        assert_eq!(guard.name(), "always_final");
        assert_eq!(guard.evaluate(&request), Decision::AdmitFinal);
    }

    #[test]
    fn boxed_guard_delegates() {
        let guard: Box<dyn Guard> =
            Box::new(FnGuard::new("deny", |_: &AdmissionRequest| {
                Decision::reject_with("no")
            }));
        let request = AdmissionRequest::new("a", "b");

        assert_eq!(guard.name(), "deny");
        assert!(!guard.evaluate(&request).is_admitting());
    }
}
