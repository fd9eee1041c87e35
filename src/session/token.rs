use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;

/// Opaque bearer credential issued by the service on login.
///
/// No expiry or refresh data is tracked: a token is valid until the server
/// rejects it. `Debug` never prints the secret.
#[derive(Clone)]
pub struct SessionToken(Arc<SecretString>);

impl SessionToken {
    /// Wrap a raw token. Empty or whitespace-only strings count as "no token".
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self(Arc::new(SecretString::from(raw))))
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}
