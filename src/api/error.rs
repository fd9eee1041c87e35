use std::time::Duration;
use thiserror::Error;

/// Everything that can go wrong between a user action and the service.
///
/// Validation and `Unauthenticated` are raised locally and never reach the
/// network. `Remote` carries the service's own `error` message when it sent one.
/// Transport-level failures are shown to the user through the same fallback
/// text as remote failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Service returned status {status}{}", message_suffix(.message))]
    Remote { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),

    #[error("Unexpected response body: {0}")]
    InvalidBody(String),
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

impl ApiError {
    /// Text shown to the user: the validation text, the server's `error`
    /// field, or the caller's fallback for everything else.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Validation(msg) => (*msg).to_string(),
            ApiError::Unauthenticated => "Please log in first".to_string(),
            ApiError::Remote {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// True when the service rejected the credential. Callers react by
    /// destroying the session; the gateway itself never does.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, ApiError::Remote { status: 401, .. })
    }

    /// Transport failures and timeouts: the only errors a retry may help with.
    pub(crate) fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }
}
