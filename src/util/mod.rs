//! Small helpers shared by the client layers.
//!
//! - **Base URL policy**: decides whether a service URL may carry a bearer credential
//! - **Text**: sanitizing and fitting server-provided strings for terminal rendering

mod text;
mod url_policy;

pub use text::{sanitize_for_terminal, truncate_to_width};
pub use url_policy::{parse_service_url, UrlPolicyError};
