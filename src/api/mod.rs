//! Client side of the recommendation service.
//!
//! Every call goes through the [`Gateway`], which attaches the session token
//! and turns non-2xx responses into [`ApiError::Remote`]. On top of it:
//!
//! - [`auth`] - login, registration, logout
//! - [`recommendations`] - title-keyed recommendation query and its view state
//! - [`watchlist`] - the ordered watchlist, mutated remotely and re-fetched
//!   after every change
//!
//! # Example
//!
//! ```ignore
//! let gateway = Gateway::new(base_url, tokens.clone(), RequestPolicy::default())?;
//! let auth = AuthClient::new(gateway.clone());
//! auth.login("a", "b").await?;
//!
//! let remote = WatchlistRemote::new(gateway);
//! let mut watchlist = WatchlistController::new(Consistency::LastResponse);
//! let op = WatchlistOp::Add("Dune".into());
//! let ticket = watchlist.begin(&op);
//! let result = remote.run(&op).await;
//! watchlist.apply(ticket, result);
//! ```

pub mod auth;
mod error;
mod gateway;
pub mod recommendations;
mod sequence;
mod types;
pub mod watchlist;

pub use auth::{AuthClient, LoginOutcome};
pub use error::ApiError;
pub use gateway::{Gateway, RequestPolicy};
pub use recommendations::{RecommendationQuery, RecommendationsClient};
pub use sequence::Ticket;
pub use types::WatchlistEntry;
pub use watchlist::{
    ApplyOutcome, Phase, SyncError, WatchlistController, WatchlistOp, WatchlistRemote,
};
