use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors raised while validating the service base URL.
#[derive(Error, Debug)]
pub enum UrlPolicyError {
    #[error("Invalid service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("Service URL has no host")]
    MissingHost,
    /// Plain http is only tolerated for loopback development servers.
    #[error("Insecure service URL: https is required for non-loopback host {0}")]
    InsecureRemote(String),
}

/// Parse and validate the base URL of the recommendation service.
///
/// The bearer token rides on every request, so plain `http` is rejected unless
/// the host is loopback (`localhost`, `127.0.0.0/8`, `::1`). The returned URL
/// always ends with `/` so relative endpoint paths join under it.
///
/// ```
/// use cinelist::util::parse_service_url;
///
/// assert!(parse_service_url("http://127.0.0.1:5000").is_ok());
/// assert!(parse_service_url("https://movies.example.com").is_ok());
/// assert!(parse_service_url("http://movies.example.com").is_err());
/// ```
pub fn parse_service_url(raw: &str) -> Result<Url, UrlPolicyError> {
    let mut url = Url::parse(raw.trim())?;

    let host = url.host_str().ok_or(UrlPolicyError::MissingHost)?.to_owned();

    match url.scheme() {
        "https" => {}
        "http" => {
            if !is_loopback_host(&host) {
                return Err(UrlPolicyError::InsecureRemote(host));
            }
            tracing::debug!(host = %host, "Using plain http for loopback service URL");
        }
        scheme => return Err(UrlPolicyError::UnsupportedScheme(scheme.to_owned())),
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

fn is_loopback_host(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return true;
    }
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    bare.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback())
}
