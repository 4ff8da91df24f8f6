use crate::credential::Credential;

/// A single admission attempt.
///
/// Built by the caller for one call to [`Chain::admit`](crate::Chain::admit)
/// and never modified by the guards that inspect it.
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    identity: String,
    credential: Credential,
}

impl AdmissionRequest {
    /// Creates a request for `identity` presenting `credential`.
    pub fn new(identity: impl Into<String>, credential: impl Into<Credential>) -> Self {
        Self {
            identity: identity.into(),
            credential: credential.into(),
        }
    }

    /// The identity key being admitted, e.g. an email address.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The secret presented with the identity.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}
