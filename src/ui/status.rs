use crate::app::{App, RecFocus, View};
use crate::util::sanitize_for_terminal;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner glyph for the given frame.
pub fn spinner(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

pub(super) fn spinner_len() -> usize {
    SPINNER.len()
}

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // EDGE-001: Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Transient messages take precedence over the key hints
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        sanitize_for_terminal(msg)
    } else {
        Cow::Borrowed(hints(app))
    };

    let paragraph = Paragraph::new(text).style(app.theme.status_bar);
    f.render_widget(paragraph, area);
}

fn hints(app: &App) -> &'static str {
    match app.view {
        View::Landing => {
            if app.is_logged_in() {
                "[c]recommendations [w]atchlist [o]logout [t]heme [?]help [q]uit"
            } else {
                "[l]ogin [r]egister [t]heme [?]help [q]uit"
            }
        }
        View::Login | View::Register => "Tab next field | Enter submit | Esc back",
        View::Recommendations => match app.rec_focus {
            RecFocus::Input => "Enter search | Ctrl+A add title | Tab results | Esc back",
            RecFocus::Results => "[j/k]move [a]dd [i]nput [w]atchlist [o]logout [?]help [q]uit",
        },
        View::Watchlist => "[j/k]move [K/J]priority [x]remove [r]efresh [c]recs [?]help [q]uit",
    }
}
