//! Session state: the bearer credential, where it lives, and who may enter
//! protected views.
//!
//! - [`SessionToken`] wraps the opaque credential so it never reaches logs
//! - [`TokenStore`] is the explicit, cloneable session object handed to the
//!   gateway and the guard; it mirrors the credential into the state database
//! - [`SessionGuard`] is the presence check run on every entry to a protected view

mod guard;
mod store;
mod token;

pub use guard::{GuardDecision, SessionGuard};
pub use store::TokenStore;
pub use token::SessionToken;
