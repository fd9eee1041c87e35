//! Help overlay: scrollable keybinding table.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::render::centered_rect;

/// Keybindings grouped by the view they apply to.
const SECTIONS: [(&str, &[(&str, &str)]); 5] = [
    (
        "General",
        &[
            ("?", "Toggle help"),
            ("t", "Cycle colour theme"),
            ("o", "Log out"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
    (
        "Home",
        &[
            ("l", "Log in"),
            ("r", "Register"),
            ("c / Enter", "Recommendations"),
            ("w", "Watchlist"),
        ],
    ),
    (
        "Login / Register",
        &[
            ("Tab / Down", "Next field"),
            ("Shift+Tab / Up", "Previous field"),
            ("Enter", "Next field / submit"),
            ("Esc", "Back to home"),
        ],
    ),
    (
        "Recommendations",
        &[
            ("Enter", "Search for the typed title"),
            ("Ctrl+A", "Add the typed title to watchlist"),
            ("Tab", "Switch input / results"),
            ("j / k", "Select result"),
            ("a", "Add selected result to watchlist"),
            ("w", "Open watchlist"),
        ],
    ),
    (
        "Watchlist",
        &[
            ("j / k", "Select movie"),
            ("K / u", "Move up"),
            ("J / n", "Move down"),
            ("x / Del", "Remove"),
            ("r", "Refresh"),
            ("c", "Recommendations"),
        ],
    ),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    let overlay = centered_rect(80, 80, area);
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, bindings) in SECTIONS.iter() {
        rows.push(
            Row::new(vec![
                Line::from(Span::styled(
                    format!("-- {label} --"),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ])
            .style(app.theme.title),
        );
        for (key, description) in bindings.iter() {
            rows.push(Row::new(vec![format!("  {key}"), description.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let total_rows = rows.len();
    let visible_height = overlay.height.saturating_sub(3) as usize; // -2 border -1 header
    let max_scroll = total_rows.saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);
    let visible_rows: Vec<Row> = rows.into_iter().skip(scroll).take(visible_height).collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let widths = [Constraint::Length(18), Constraint::Min(20)];
    let table = Table::new(visible_rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.panel_border_focused)
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);

    if max_scroll > 0 && scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.theme.empty_hint,
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}
