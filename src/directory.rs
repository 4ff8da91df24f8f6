//! The identity store consulted by [`CredentialGuard`](crate::CredentialGuard).

use crate::credential::Credential;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// A lookup failure inside an identity directory.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("identity directory unavailable: {message}")]
pub struct DirectoryError {
    message: String,
}

impl DirectoryError {
    /// Creates a directory error with a diagnostic message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The diagnostic message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Read-only view of a store of identities and their secrets.
///
/// Admission guards only ever query a directory; registration belongs to
/// whoever owns the concrete store. Implementations backed by slow I/O should
/// do that work before admission, since guards call these methods inline.
pub trait IdentityDirectory: Send + Sync {
    /// Whether `identity` is registered.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the directory cannot answer.
    fn exists(&self, identity: &str) -> Result<bool, DirectoryError>;

    /// Whether `credential` is the secret registered for `identity`.
    ///
    /// Returns `Ok(false)` for unknown identities.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] if the directory cannot answer.
    fn matches(&self, identity: &str, credential: &Credential) -> Result<bool, DirectoryError>;
}

/// A thread-safe in-memory identity directory.
///
/// # Examples
///
/// ```
/// use admission_core::{Credential, IdentityDirectory, InMemoryDirectory};
///
/// let directory = InMemoryDirectory::new();
/// directory.register("admin@example.com", "admin_pass");
///
/// assert_eq!(directory.exists("admin@example.com"), Ok(true));
/// assert_eq!(
///     directory.matches("admin@example.com", &Credential::new("admin_pass")),
///     Ok(true)
/// );
/// ```
#[derive(Default)]
pub struct InMemoryDirectory {
    secrets: RwLock<HashMap<String, String>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style registration, for setting up directories inline.
    pub fn with_identity(self, identity: impl Into<String>, secret: impl Into<String>) -> Self {
        self.register(identity, secret);
        self
    }

    /// Registers `identity` with `secret`, replacing any previous secret.
    pub fn register(&self, identity: impl Into<String>, secret: impl Into<String>) {
        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        secrets.insert(identity.into(), secret.into());
    }

    /// Removes `identity`. Returns `true` if it was registered.
    pub fn remove(&self, identity: &str) -> bool {
        let mut secrets = self.secrets.write().unwrap_or_else(PoisonError::into_inner);
        secrets.remove(identity).is_some()
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.secrets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no identity is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IdentityDirectory for InMemoryDirectory {
    fn exists(&self, identity: &str) -> Result<bool, DirectoryError> {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        Ok(secrets.contains_key(identity))
    }

    fn matches(&self, identity: &str, credential: &Credential) -> Result<bool, DirectoryError> {
        let secrets = self.secrets.read().unwrap_or_else(PoisonError::into_inner);
        Ok(secrets
            .get(identity)
            .is_some_and(|secret| credential.matches(secret)))
    }
}

// Never list the stored secrets.
impl std::fmt::Debug for InMemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDirectory")
            .field("identities", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_identity_does_not_match() {
        let directory = InMemoryDirectory::new();

        assert_eq!(directory.exists("ghost"), Ok(false));
        assert_eq!(directory.matches("ghost", &Credential::new("")), Ok(false));
    }

    #[test]
    fn register_replaces_secret() {
        let directory = InMemoryDirectory::new().with_identity("user@example.com", "old");
        directory.register("user@example.com", "new");

        assert_eq!(directory.len(), 1);
        assert_eq!(
            directory.matches("user@example.com", &Credential::new("old")),
            Ok(false)
        );
        assert_eq!(
            directory.matches("user@example.com", &Credential::new("new")),
            Ok(true)
        );
    }

    #[test]
    fn remove_forgets_identity() {
        let directory = InMemoryDirectory::new().with_identity("a", "1");

        assert!(directory.remove("a"));
        assert!(!directory.remove("a"));
        assert!(directory.is_empty());
    }

    #[test]
    fn debug_hides_secrets() {
        let directory = InMemoryDirectory::new().with_identity("a", "topsecret");
        let debug_output = format!("{:?}", directory);

        assert!(!debug_output.contains("topsecret"));
        assert!(debug_output.contains("identities: 1"));
    }
}
