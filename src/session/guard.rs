use super::store::TokenStore;
use crate::app::View;

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    RedirectToLogin,
}

/// Precondition check for protected views.
///
/// Evaluated on every navigation; it looks only at token presence and never
/// asks the server whether the token is still valid.
#[derive(Clone)]
pub struct SessionGuard {
    tokens: TokenStore,
}

impl SessionGuard {
    pub fn new(tokens: TokenStore) -> Self {
        Self { tokens }
    }

    pub fn check(&self, target: View) -> GuardDecision {
        if target.is_protected() && !self.tokens.is_present() {
            tracing::debug!(view = ?target, "No session token, redirecting to login");
            return GuardDecision::RedirectToLogin;
        }
        GuardDecision::Proceed
    }
}
