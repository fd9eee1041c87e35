//! Login, registration and logout.
use super::error::ApiError;
use super::gateway::Gateway;
use super::types::{Credentials, LoginResponse, MessageResponse};
use crate::session::SessionToken;

const LOGIN_PATH: &str = "api/auth/login";
const REGISTER_PATH: &str = "api/auth/register";
const LOGOUT_PATH: &str = "api/auth/logout";

pub const LOGIN_FALLBACK: &str = "Login failed";
pub const REGISTER_FALLBACK: &str = "Registration failed";
const REGISTER_SUCCESS: &str = "Registered successfully!";

/// Result of a login round trip that the service accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A non-empty `access_token` came back and is now in the store.
    SessionEstablished,
    /// 2xx without a usable token. Nothing was stored.
    NoToken,
}

#[derive(Clone)]
pub struct AuthClient {
    gateway: Gateway,
}

impl AuthClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for a session token and store it.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation("Username and password are required"));
        }

        let body: Option<LoginResponse> = self
            .gateway
            .post(LOGIN_PATH, &Credentials { username, password })
            .await?;

        let Some(token) = body
            .and_then(|b| b.access_token)
            .and_then(SessionToken::new)
        else {
            tracing::info!("Login accepted without an access token");
            return Ok(LoginOutcome::NoToken);
        };

        // The in-memory store is updated before persisting, so a write failure
        // still leaves this process logged in.
        if let Err(e) = self.gateway.tokens().set(token).await {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
        Ok(LoginOutcome::SessionEstablished)
    }

    /// Create an account. Returns the message to show; never logs the user in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm: &str,
    ) -> Result<String, ApiError> {
        if password != confirm {
            return Err(ApiError::Validation("Passwords do not match"));
        }

        let body: Option<MessageResponse> = self
            .gateway
            .post(REGISTER_PATH, &Credentials { username, password })
            .await?;

        tracing::info!("Registration accepted");
        Ok(body
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| REGISTER_SUCCESS.to_string()))
    }

    /// Tell the service (if logged in) and then drop the local session.
    ///
    /// The remote call is best-effort: failures are logged and the local
    /// session is cleared regardless.
    pub async fn logout(&self) -> anyhow::Result<()> {
        if self.gateway.tokens().is_present() {
            match self
                .gateway
                .post::<_, Option<MessageResponse>>(LOGOUT_PATH, &serde_json::json!({}))
                .await
            {
                Ok(_) => tracing::debug!("Remote logout acknowledged"),
                Err(e) => tracing::warn!(error = %e, "Remote logout failed, clearing local session anyway"),
            }
        }

        self.gateway.tokens().clear().await
    }
}
