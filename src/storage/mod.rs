//! Durable client-local state.
//!
//! A single SQLite file holds a key/value table. The client keeps exactly one
//! key there today: the session token (see [`crate::session::TokenStore`]).

mod schema;
mod state;
mod types;

pub use schema::Database;
pub use state::SESSION_TOKEN_KEY;
pub use types::DatabaseError;
