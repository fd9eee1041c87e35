//! Terminal User Interface module.
//!
//! This module provides the TUI for the movie client, including:
//! - Main event loop (`run`)
//! - Input handling for the forms, recommendations and watchlist views
//! - Background task spawning and result processing
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Task spawning and panic isolation
//! - `render` - View rendering dispatch
//! - `landing`, `forms`, `recommendations`, `watchlist` - View widgets
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod events;
mod forms;
mod help;
mod helpers;
mod input;
mod landing;
mod loop_runner;
mod recommendations;
mod render;
mod status;
mod watchlist;

// Re-export the public API
pub use events::handle_app_event;
pub use helpers::{
    enter_view, spawn_login, spawn_logout, spawn_recommendations, spawn_register,
    spawn_watchlist_op,
};
pub use loop_runner::{run, Action};
