//! Render functions for the TUI.
//!
//! This module handles the frame layout (navigation bar, body, status bar)
//! and dispatches the body to the renderer for the current view.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{forms, help, landing, recommendations, status, watchlist};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // EDGE-001: Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_nav(f, app, chunks[0]);

    match app.view {
        View::Landing => landing::render(f, app, chunks[1]),
        View::Login => forms::render(f, app, &app.login_form, "Login", chunks[1]),
        View::Register => forms::render(f, app, &app.register_form, "Register", chunks[1]),
        View::Recommendations => recommendations::render(f, app, chunks[1]),
        View::Watchlist => watchlist::render(f, app, chunks[1]),
    }

    status::render(f, app, chunks[2]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Top navigation bar. Mirrors what a logged-in or logged-out user can reach.
fn render_nav(f: &mut Frame, app: &App, area: Rect) {
    let tabs: &[View] = if app.is_logged_in() {
        &[View::Landing, View::Recommendations, View::Watchlist]
    } else {
        &[View::Landing, View::Login, View::Register]
    };

    let mut spans = vec![Span::styled(" cinelist ", app.theme.title), Span::raw(" ")];
    for view in tabs {
        let style = if *view == app.view {
            app.theme.nav_active
        } else {
            app.theme.nav_inactive
        };
        spans.push(Span::styled(format!(" {} ", view.title()), style));
        spans.push(Span::raw(" "));
    }

    let session = if app.is_logged_in() {
        Span::styled("[o] logout", app.theme.nav_inactive)
    } else {
        Span::styled("guest", app.theme.nav_inactive)
    };
    spans.push(session);

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
