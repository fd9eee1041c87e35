use crate::app::{App, RecFocus};
use crate::util::{sanitize_for_terminal, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the title input and the recommendation results.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input_focused = app.rec_focus == RecFocus::Input;
    let cursor = if input_focused { "_" } else { "" };
    let input = Paragraph::new(format!("{}{cursor}", app.title_input)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(if input_focused {
                t.panel_border_focused
            } else {
                t.panel_border
            })
            .title(" Movie title "),
    );
    f.render_widget(input, chunks[0]);

    let results_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if input_focused {
            t.panel_border
        } else {
            t.panel_border_focused
        })
        .title(" Recommendations ");

    let query = &app.recommendations;
    if query.is_loading() && query.results().is_empty() {
        let spinner = super::status::spinner(app.spinner_frame);
        let p = Paragraph::new(Span::styled(format!("{spinner} Loading..."), t.pending))
            .block(results_block);
        f.render_widget(p, chunks[1]);
        return;
    }

    if let Some(err) = query.error() {
        let p = Paragraph::new(Span::styled(sanitize_for_terminal(err).into_owned(), t.error))
            .block(results_block);
        f.render_widget(p, chunks[1]);
        return;
    }

    if query.results().is_empty() {
        let p = Paragraph::new(Line::from(Span::styled(
            "Enter a title and press Enter",
            t.empty_hint,
        )))
        .block(results_block);
        f.render_widget(p, chunks[1]);
        return;
    }

    let width = chunks[1].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = query
        .results()
        .iter()
        .map(|title| {
            let clean = sanitize_for_terminal(title);
            ListItem::new(truncate_to_width(&clean, width).into_owned()).style(t.item_normal)
        })
        .collect();

    let list = List::new(items)
        .block(results_block)
        .highlight_style(t.item_selected)
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !input_focused {
        state.select(Some(app.selected_recommendation));
    }
    f.render_stateful_widget(list, chunks[1], &mut state);
}
