//! Colour palettes for the TUI.
//!
//! Each field is a semantic role rather than a colour, so views never pick
//! colours themselves. `ThemeVariant` selects between a dark and a light set.

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

impl ThemeVariant {
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette::dark(),
            Self::Light => Palette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Palette {
    // Lists
    pub item_normal: Style,
    pub item_selected: Style,
    pub item_priority: Style,
    pub empty_hint: Style,

    // Forms
    pub field_label: Style,
    pub field_active: Style,
    pub field_inactive: Style,

    // Messages
    pub error: Style,
    pub success: Style,
    pub pending: Style,

    // Chrome
    pub title: Style,
    pub nav_active: Style,
    pub nav_inactive: Style,
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl Palette {
    fn dark() -> Self {
        Self {
            item_normal: Style::default(),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_priority: Style::default().fg(Color::DarkGray),
            empty_hint: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            field_label: Style::default().add_modifier(Modifier::BOLD),
            field_active: Style::default().fg(Color::Cyan),
            field_inactive: Style::default().fg(Color::Gray),

            error: Style::default().fg(Color::Red),
            success: Style::default().fg(Color::Green),
            pending: Style::default().fg(Color::Yellow),

            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            nav_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            nav_inactive: Style::default().fg(Color::Gray),
            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    fn light() -> Self {
        Self {
            item_normal: Style::default().fg(Color::Black),
            item_selected: Style::default().bg(Color::Blue).fg(Color::White),
            item_priority: Style::default().fg(Color::DarkGray),
            empty_hint: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),

            field_label: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            field_active: Style::default().fg(Color::Blue),
            field_inactive: Style::default().fg(Color::DarkGray),

            error: Style::default().fg(Color::Red),
            success: Style::default().fg(Color::Green),
            pending: Style::default().fg(Color::Magenta),

            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            nav_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            nav_inactive: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}
