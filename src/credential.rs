use std::fmt;

/// The secret half of an admission request.
///
/// `Credential` keeps the presented secret out of logs and error output.
/// Guards compare against it with [`matches`](Self::matches); the raw value is
/// only reachable through [`expose`](Self::expose).
///
/// # Examples
///
/// ```
/// use admission_core::Credential;
///
/// let credential = Credential::new("hunter2");
///
/// assert_eq!(format!("{:?}", credential), "[REDACTED]");
/// assert_eq!(format!("{}", credential), "[REDACTED]");
/// assert!(credential.matches("hunter2"));
/// ```
// Do NOT derive Debug or Display: both must stay redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    inner: String,
}

impl Credential {
    /// Wraps a presented secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Returns `true` if the presented secret equals `expected`.
    ///
    /// The comparison visits every byte of equal-length inputs, so the time
    /// taken does not reveal the position of the first mismatch.
    pub fn matches(&self, expected: &str) -> bool {
        let presented = self.inner.as_bytes();
        let expected = expected.as_bytes();
        if presented.len() != expected.len() {
            return false;
        }
        presented
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Explicitly exposes the raw secret.
    ///
    /// Never log or display the returned value.
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_redacts_debug_and_display() {
        let credential = Credential::new("admin_pass");

        let debug_output = format!("{:?}", credential);
        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("admin_pass"));

        assert_eq!(format!("{}", credential), "[REDACTED]");
    }

    #[test]
    fn credential_matches_exact_value_only() {
        let credential = Credential::new("pw1");

        assert!(credential.matches("pw1"));
        assert!(!credential.matches("pw2"));
        assert!(!credential.matches("pw"));
        assert!(!credential.matches("pw11"));
        assert!(!credential.matches(""));
    }

    #[test]
    fn empty_credential_matches_empty_secret() {
        assert!(Credential::new("").matches(""));
    }

    #[test]
    fn credential_exposes_when_explicit() {
        let credential = Credential::from("sk-123".to_string());
        assert_eq!(credential.expose(), "sk-123");
    }
}
