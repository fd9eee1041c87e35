use crate::app::{App, Form};
use crate::util::sanitize_for_terminal;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::render::centered_rect;

/// Render a login or registration form inside a centered box.
pub fn render(f: &mut Frame, app: &App, form: &Form, title: &str, area: Rect) {
    let t = &app.theme;
    let boxed = centered_rect(60, 80, area);

    let mut lines = Vec::with_capacity(form.fields.len() * 2 + 4);
    for (idx, field) in form.fields.iter().enumerate() {
        let active = idx == form.focus;
        let value = if field.secret {
            "*".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        let cursor = if active { "_" } else { "" };

        lines.push(Line::from(Span::styled(field.label, t.field_label)));
        lines.push(Line::from(Span::styled(
            format!("> {value}{cursor}"),
            if active { t.field_active } else { t.field_inactive },
        )));
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled("Submitting...", t.pending)));
    }
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            sanitize_for_terminal(err).into_owned(),
            t.error,
        )));
    }
    if let Some(notice) = &form.notice {
        lines.push(Line::from(Span::styled(
            sanitize_for_terminal(notice).into_owned(),
            t.success,
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(t.panel_border_focused)
            .title(format!(" {title} ")),
    );
    f.render_widget(paragraph, boxed);
}
