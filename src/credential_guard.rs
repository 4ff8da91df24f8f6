use crate::{
    decision::{Decision, RejectionKind},
    directory::{DirectoryError, IdentityDirectory},
    guard::Guard,
    request::AdmissionRequest,
};
use std::sync::Arc;

/// Verifies the request's identity and credential against a directory.
///
/// - unknown identity: `Reject("unknown identity")`, whatever the credential
/// - known identity, wrong credential: `Reject("invalid credential")`
/// - otherwise: `Admit`
///
/// A directory fault becomes `Reject("identity directory unavailable")`;
/// nothing escapes the guard as an error.
pub struct CredentialGuard {
    directory: Arc<dyn IdentityDirectory>,
}

impl CredentialGuard {
    /// Creates a guard consulting `directory`.
    pub fn new(directory: Arc<dyn IdentityDirectory>) -> Self {
        Self { directory }
    }

    fn check(&self, request: &AdmissionRequest) -> Result<Decision, DirectoryError> {
        let identity = request.identity();
        if !self.directory.exists(identity)? {
            return Ok(Decision::reject(RejectionKind::UnknownIdentity));
        }
        if !self.directory.matches(identity, request.credential())? {
            return Ok(Decision::reject(RejectionKind::InvalidCredential));
        }
        Ok(Decision::Admit)
    }
}

impl Guard for CredentialGuard {
    fn name(&self) -> &str {
        "credential"
    }

    fn evaluate(&self, request: &AdmissionRequest) -> Decision {
        self.check(request).unwrap_or_else(|err| {
            tracing::error!(
                identity = %request.identity(),
                error = %err,
                "credential check failed"
            );
            Decision::reject(RejectionKind::DirectoryUnavailable)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use crate::decision::Rejection;
    use crate::directory::InMemoryDirectory;

    struct UnreachableDirectory;

    impl IdentityDirectory for UnreachableDirectory {
        fn exists(&self, _identity: &str) -> Result<bool, DirectoryError> {
            Err(DirectoryError::new("connection refused"))
        }

        fn matches(
            &self,
            _identity: &str,
            _credential: &Credential,
        ) -> Result<bool, DirectoryError> {
            Err(DirectoryError::new("connection refused"))
        }
    }

    fn guard() -> CredentialGuard {
        CredentialGuard::new(Arc::new(
            InMemoryDirectory::new().with_identity("user@example.com", "user_pass"),
        ))
    }

    fn rejection(kind: RejectionKind) -> Decision {
        Decision::Reject(Rejection::from(kind))
    }

    #[test]
    fn unknown_identity_rejected_regardless_of_credential() {
        let guard = guard();
        for credential in ["", "user_pass", "anything"] {
            let request = AdmissionRequest::new("nobody@example.com", credential);
            assert_eq!(
                guard.evaluate(&request),
                rejection(RejectionKind::UnknownIdentity)
            );
        }
    }

    #[test]
    fn wrong_credential_rejected() {
        let request = AdmissionRequest::new("user@example.com", "guess");
        assert_eq!(
            guard().evaluate(&request),
            rejection(RejectionKind::InvalidCredential)
        );
    }

    #[test]
    fn matching_credential_admitted() {
        let request = AdmissionRequest::new("user@example.com", "user_pass");
        assert_eq!(guard().evaluate(&request), Decision::Admit);
    }

    #[test]
    fn directory_fault_becomes_rejection() {
        let guard = CredentialGuard::new(Arc::new(UnreachableDirectory));
        let request = AdmissionRequest::new("user@example.com", "user_pass");

        let decision = guard.evaluate(&request);
        assert_eq!(decision, rejection(RejectionKind::DirectoryUnavailable));
        match decision {
            Decision::Reject(r) => assert_eq!(r.reason, "identity directory unavailable"),
            _ => unreachable!(),
        }
    }
}
