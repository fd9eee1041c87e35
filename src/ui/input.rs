//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on the current view. Form and text-entry views capture
//! printable keys, so their navigation lives on Esc, Tab and Enter.

use crate::api::WatchlistOp;
use crate::app::{App, AppEvent, RecFocus, View};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{
    enter_view, spawn_login, spawn_logout, spawn_recommendations, spawn_register,
    spawn_watchlist_op,
};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // Help overlay captures all keys when visible
    if app.show_help {
        handle_help_input(app, code);
        return Action::Continue;
    }

    match app.view {
        View::Landing => handle_landing_input(app, code, event_tx),
        View::Login | View::Register => {
            handle_form_input(app, code, event_tx);
            Action::Continue
        }
        View::Recommendations => match app.rec_focus {
            RecFocus::Input => {
                handle_title_input(app, code, modifiers, event_tx);
                Action::Continue
            }
            RecFocus::Results => handle_results_input(app, code, event_tx),
        },
        View::Watchlist => handle_watchlist_input(app, code, event_tx),
    }
}

/// Keys shared by every list-style view. Returns `None` if not handled.
fn handle_global_key(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Option<Action> {
    match code {
        KeyCode::Char('q') => return Some(Action::Quit),
        KeyCode::Char('?') => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('t') => app.cycle_theme(),
        KeyCode::Char('o') => {
            if app.is_logged_in() {
                spawn_logout(app, event_tx);
            } else {
                app.set_status("Not logged in");
            }
        }
        _ => return None,
    }
    Some(Action::Continue)
}

fn handle_help_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_landing_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    if let Some(action) = handle_global_key(app, code, event_tx) {
        return action;
    }
    match code {
        KeyCode::Char('l') => {
            app.navigate(View::Login);
        }
        KeyCode::Char('r') => {
            app.navigate(View::Register);
        }
        KeyCode::Char('c') | KeyCode::Enter => {
            enter_view(app, View::Recommendations, event_tx);
        }
        KeyCode::Char('w') => {
            enter_view(app, View::Watchlist, event_tx);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_form_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) {
    let is_login = app.view == View::Login;
    let form = if is_login {
        &mut app.login_form
    } else {
        &mut app.register_form
    };

    match code {
        KeyCode::Esc => {
            app.navigate(View::Landing);
        }
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Enter => {
            if form.focus + 1 < form.fields.len() {
                form.next_field();
            } else if is_login {
                spawn_login(app, event_tx);
            } else {
                spawn_register(app, event_tx);
            }
        }
        KeyCode::Char(c) => form.push_char(c),
        _ => {}
    }
}

fn handle_title_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match code {
        KeyCode::Char('a') if modifiers.contains(KeyModifiers::CONTROL) => {
            let title = app.title_input.trim().to_string();
            if title.is_empty() {
                app.set_status("Please enter a movie title");
            } else {
                spawn_watchlist_op(app, WatchlistOp::Add(title), event_tx);
            }
        }
        KeyCode::Enter => spawn_recommendations(app, event_tx),
        KeyCode::Esc => {
            if app.recommendations.results().is_empty() {
                app.navigate(View::Landing);
            } else {
                app.rec_focus = RecFocus::Results;
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            if !app.recommendations.results().is_empty() {
                app.rec_focus = RecFocus::Results;
            }
        }
        KeyCode::Backspace => {
            app.title_input.pop();
        }
        KeyCode::Char(c) => {
            if app.title_input.chars().count() < crate::app::MAX_FIELD_LENGTH {
                app.title_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_results_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    if let Some(action) = handle_global_key(app, code, event_tx) {
        return action;
    }
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char('a') | KeyCode::Enter => {
            if let Some(title) = app.selected_recommendation_title().map(str::to_owned) {
                spawn_watchlist_op(app, WatchlistOp::Add(title), event_tx);
            }
        }
        KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Tab => {
            app.rec_focus = RecFocus::Input;
        }
        KeyCode::Char('w') => {
            enter_view(app, View::Watchlist, event_tx);
        }
        KeyCode::Char('h') | KeyCode::Esc => {
            app.navigate(View::Landing);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_watchlist_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    if let Some(action) = handle_global_key(app, code, event_tx) {
        return action;
    }

    let selected = app.selected_watchlist_title().map(str::to_owned);
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),
        KeyCode::Char('K') | KeyCode::Char('u') => {
            if let Some(title) = selected {
                spawn_watchlist_op(app, WatchlistOp::MoveUp(title), event_tx);
            }
        }
        KeyCode::Char('J') | KeyCode::Char('n') => {
            if let Some(title) = selected {
                spawn_watchlist_op(app, WatchlistOp::MoveDown(title), event_tx);
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => {
            if let Some(title) = selected {
                spawn_watchlist_op(app, WatchlistOp::Remove(title), event_tx);
            }
        }
        KeyCode::Char('r') => spawn_watchlist_op(app, WatchlistOp::Fetch, event_tx),
        KeyCode::Char('c') => {
            enter_view(app, View::Recommendations, event_tx);
        }
        KeyCode::Char('h') | KeyCode::Esc => {
            app.navigate(View::Landing);
        }
        _ => {}
    }
    Action::Continue
}
