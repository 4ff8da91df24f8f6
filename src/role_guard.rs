use crate::{decision::Decision, error::ConfigError, guard::Guard, request::AdmissionRequest};
use std::collections::HashSet;
use std::fmt;

/// Which identities a [`RoleGuard`] treats as privileged.
pub enum Privileged {
    /// Exact match against a fixed set of identities
    Identities(HashSet<String>),
    /// Arbitrary predicate over the identity
    Matching(Box<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Privileged {
    fn contains(&self, identity: &str) -> bool {
        match self {
            Privileged::Identities(set) => set.contains(identity),
            Privileged::Matching(predicate) => predicate(identity),
        }
    }
}

impl fmt::Debug for Privileged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Privileged::Identities(set) => f.debug_tuple("Identities").field(set).finish(),
            Privileged::Matching(_) => f.write_str("Matching(..)"),
        }
    }
}

/// Fast-path for privileged identities.
///
/// Returns [`Decision::AdmitFinal`] for a privileged identity, which admits
/// the request and skips every guard after this one. Everyone else gets
/// [`Decision::Admit`]. Where this guard sits in the chain decides which
/// checks privileged identities bypass.
///
/// # Examples
///
/// ```
/// use admission_core::{AdmissionRequest, Decision, Guard, RoleGuard};
///
/// let guard = RoleGuard::for_identity("admin@example.com").unwrap();
///
/// let admin = AdmissionRequest::new("admin@example.com", "pw");
/// let user = AdmissionRequest::new("user@example.com", "pw");
///
/// assert_eq!(guard.evaluate(&admin), Decision::AdmitFinal);
/// assert_eq!(guard.evaluate(&user), Decision::Admit);
/// ```
#[derive(Debug)]
pub struct RoleGuard {
    privileged: Privileged,
}

impl RoleGuard {
    /// Creates a guard from a privilege rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPrivilegedIdentities`] for an empty identity set
    /// and [`ConfigError::EmptyPrivilegedIdentity`] if the set contains `""`.
    pub fn new(privileged: Privileged) -> Result<Self, ConfigError> {
        if let Privileged::Identities(set) = &privileged {
            if set.is_empty() {
                return Err(ConfigError::NoPrivilegedIdentities);
            }
            if set.contains("") {
                return Err(ConfigError::EmptyPrivilegedIdentity);
            }
        }
        Ok(Self { privileged })
    }

    /// A guard privileging exactly one identity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPrivilegedIdentity`] if `identity` is empty.
    pub fn for_identity(identity: impl Into<String>) -> Result<Self, ConfigError> {
        Self::new(Privileged::Identities(HashSet::from([identity.into()])))
    }

    /// A guard privileging every identity in `identities`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPrivilegedIdentities`] if `identities` is empty
    /// and [`ConfigError::EmptyPrivilegedIdentity`] if any of them is empty.
    pub fn for_identities<I, S>(identities: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Privileged::Identities(
            identities.into_iter().map(Into::into).collect(),
        ))
    }

    /// A guard privileging identities for which `predicate` holds.
    pub fn matching(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            privileged: Privileged::Matching(Box::new(predicate)),
        }
    }

    /// Whether `identity` is privileged under this guard's rule.
    pub fn is_privileged(&self, identity: &str) -> bool {
        self.privileged.contains(identity)
    }
}

impl Guard for RoleGuard {
    fn name(&self) -> &str {
        "role"
    }

    fn evaluate(&self, request: &AdmissionRequest) -> Decision {
        if self.is_privileged(request.identity()) {
            tracing::debug!(identity = %request.identity(), "privileged identity");
            Decision::AdmitFinal
        } else {
            Decision::Admit
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_only() {
        let guard = RoleGuard::for_identity("admin@example.com").unwrap();

        assert!(guard.is_privileged("admin@example.com"));
        assert!(!guard.is_privileged("ADMIN@example.com"));
        assert!(!guard.is_privileged("admin@example.com "));
    }

    #[test]
    fn identity_set() {
        let guard = RoleGuard::for_identities(["root", "ops"]).unwrap();
        let request = AdmissionRequest::new("ops", "x");

        assert_eq!(guard.evaluate(&request), Decision::AdmitFinal);
    }

    #[test]
    fn predicate_rule() {
        let guard = RoleGuard::matching(|identity| identity.ends_with("@corp.example"));

        assert_eq!(
            guard.evaluate(&AdmissionRequest::new("ceo@corp.example", "x")),
            Decision::AdmitFinal
        );
        assert_eq!(
            guard.evaluate(&AdmissionRequest::new("someone@else.example", "x")),
            Decision::Admit
        );
    }

    #[test]
    fn empty_identity_set_is_a_config_error() {
        let result = RoleGuard::for_identities(Vec::<String>::new());
        assert_eq!(result.err(), Some(ConfigError::NoPrivilegedIdentities));
    }

    #[test]
    fn empty_identity_cannot_be_privileged() {
        assert_eq!(
            RoleGuard::for_identity("").err(),
            Some(ConfigError::EmptyPrivilegedIdentity)
        );
        assert_eq!(
            RoleGuard::for_identities(["root", ""]).err(),
            Some(ConfigError::EmptyPrivilegedIdentity)
        );
    }
}
