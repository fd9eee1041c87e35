use futures::StreamExt;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use super::error::ApiError;
use super::types::ErrorBody;
use crate::session::TokenStore;

/// Upper bound for any response body the service may send back.
const MAX_RESPONSE_SIZE: usize = 1024 * 1024;

/// Gateway-wide request policy.
///
/// The defaults mirror the service contract: no timeout and no retries. When a
/// retry is enabled it is a single one, and only for transport failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestPolicy {
    pub timeout: Option<Duration>,
    pub retry_transport_once: bool,
}

/// Authenticated request gateway: the single path every outbound call takes.
///
/// The store is read when each request is sent. A present token becomes
/// `Authorization: Bearer <token>`; an absent one sends the request bare and
/// lets the server decide. Non-2xx responses and transport failures are
/// returned unchanged to the caller. The gateway never clears the session.
#[derive(Clone)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
    policy: RequestPolicy,
}

impl Gateway {
    /// `base_url` should come from [`crate::util::parse_service_url`] so that it
    /// ends in `/` and satisfies the https policy.
    pub fn new(base_url: Url, tokens: TokenStore, policy: RequestPolicy) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            // A redirect would replay the bearer header somewhere the user never
            // configured. The service does not redirect, so 3xx surfaces as an error.
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url,
            tokens,
            policy,
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET path?query` and decode the JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        self.send(Method::GET, url, None).await
    }

    /// `POST path` with a JSON body and decode the JSON response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let body = serde_json::to_vec(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
        self.send(Method::POST, url, Some(body)).await
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidBody(format!("bad endpoint {path}: {e}")))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<T, ApiError> {
        let max_attempts = if self.policy.retry_transport_once { 2 } else { 1 };
        let mut attempt = 1;

        let (status, bytes) = loop {
            match self.exchange(method.clone(), url.clone(), body.clone()).await {
                Err(e) if e.is_transport() && attempt < max_attempts => {
                    tracing::debug!(
                        error = %e,
                        method = %method,
                        path = %url.path(),
                        "Retrying once after transport failure"
                    );
                    attempt += 1;
                }
                other => break other?,
            }
        };

        if !status.is_success() {
            let err = remote_error(status, &bytes);
            tracing::debug!(status = status.as_u16(), path = %url.path(), error = %err, "Service rejected request");
            return Err(err);
        }

        decode(&bytes)
    }

    /// One request/response round trip, bounded by the policy timeout if set.
    async fn exchange(
        &self,
        method: Method,
        url: Url,
        body: Option<Vec<u8>>,
    ) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let mut request = self.client.request(method.clone(), url.clone());

        if let Some(token) = self.tokens.get() {
            let mut value = HeaderValue::from_str(&token.bearer_header())
                .map_err(|_| ApiError::Validation("Stored session token is not a valid header value"))?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body);
        }

        tracing::trace!(method = %method, path = %url.path(), "Sending request");

        let round_trip = async {
            let response = request.send().await?;
            let status = response.status();
            let bytes = read_limited_body(response, MAX_RESPONSE_SIZE).await?;
            Ok::<_, ApiError>((status, bytes))
        };

        match self.policy.timeout {
            Some(limit) => tokio::time::timeout(limit, round_trip)
                .await
                .map_err(|_| ApiError::Timeout(limit))?,
            None => round_trip.await,
        }
    }
}

/// Build `ApiError::Remote`, lifting the `error` field out of a JSON body.
fn remote_error(status: StatusCode, bytes: &[u8]) -> ApiError {
    let message = serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.error);
    ApiError::Remote {
        status: status.as_u16(),
        message,
    }
}

/// Decode a JSON body. An empty body decodes as JSON `null`, so callers that
/// expect nothing in particular can ask for `Option<_>`.
fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        bytes
    };
    serde_json::from_slice(bytes).map_err(|e| ApiError::InvalidBody(e.to_string()))
}

async fn read_limited_body(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
