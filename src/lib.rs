//! Terminal client for a movie recommendation service.
//!
//! The crate is split into a network layer (`api`), session handling
//! (`session`), durable client state (`storage`), and the TUI (`app`, `ui`).

pub mod api;
pub mod app;
pub mod config;
pub mod session;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
