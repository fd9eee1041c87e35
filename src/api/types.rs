//! Wire types for the service's JSON contract.
use serde::{Deserialize, Serialize};

/// One row of the user's watchlist as returned by `GET /api/watchlist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub title: String,
    pub priority: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct MovieTitle<'a> {
    pub movie_title: &'a str,
}

/// Body of `POST /api/auth/login`. `access_token` may legitimately be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginResponse {
    pub access_token: Option<String>,
}

/// Acknowledgement body used by register, logout and watchlist mutations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct MessageResponse {
    pub message: Option<String>,
}

/// Error convention for non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}
