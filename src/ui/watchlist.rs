use crate::api::Phase;
use crate::app::App;
use crate::util::{sanitize_for_terminal, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the watchlist in server order, with an error banner when the last
/// operation failed.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let ctl = &app.watchlist;

    let (banner_area, list_area) = if ctl.error().is_some() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);
        (Some(chunks[0]), chunks[1])
    } else {
        (None, area)
    };

    if let (Some(banner), Some(err)) = (banner_area, ctl.error()) {
        let p = Paragraph::new(Span::styled(sanitize_for_terminal(err).into_owned(), t.error))
            .block(Block::default().borders(Borders::ALL).border_style(t.error));
        f.render_widget(p, banner);
    }

    let title = match ctl.phase() {
        Phase::Pending => format!(" My Watchlist {} ", super::status::spinner(app.spinner_frame)),
        Phase::Refreshing => format!(" My Watchlist {} refreshing ", super::status::spinner(app.spinner_frame)),
        Phase::Idle | Phase::Failed => " My Watchlist ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(t.panel_border_focused)
        .title(title);

    if ctl.entries().is_empty() {
        let hint = if ctl.is_busy() {
            "Loading..."
        } else {
            "Your watchlist is empty."
        };
        let p = Paragraph::new(Line::from(Span::styled(hint, t.empty_hint))).block(block);
        f.render_widget(p, list_area);
        return;
    }

    let width = list_area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = ctl
        .entries()
        .iter()
        .map(|entry| {
            let suffix = format!(" (priority: {})", entry.priority);
            let budget = width.saturating_sub(suffix.len());
            let clean = sanitize_for_terminal(&entry.title);
            ListItem::new(Line::from(vec![
                Span::styled(truncate_to_width(&clean, budget).into_owned(), t.item_normal),
                Span::styled(suffix, t.item_priority),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(t.item_selected)
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected_entry));
    f.render_stateful_widget(list, list_area, &mut state);
}
