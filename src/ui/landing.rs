use crate::app::App;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the landing view: a short welcome and the entry points.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;

    let mut lines = vec![
        Line::from(Span::styled("Movie recommendations", t.title)),
        Line::from(""),
        Line::from("Type a movie you liked, get similar titles, and keep the"),
        Line::from("ones you want to see in a priority-ordered watchlist."),
        Line::from(""),
    ];

    if app.is_logged_in() {
        lines.push(Line::from(vec![
            Span::styled("[c] ", t.field_label),
            Span::raw("Get recommendations"),
        ]));
        lines.push(Line::from(vec![
            Span::styled("[w] ", t.field_label),
            Span::raw("Open your watchlist"),
        ]));
        lines.push(Line::from(vec![
            Span::styled("[o] ", t.field_label),
            Span::raw("Log out"),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("[l] ", t.field_label),
            Span::raw("Log in"),
        ]));
        lines.push(Line::from(vec![
            Span::styled("[r] ", t.field_label),
            Span::raw("Create an account"),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("[?] help   [q] quit", t.empty_hint)));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(t.panel_border)
                .title(" Welcome "),
        );
    f.render_widget(paragraph, area);
}
