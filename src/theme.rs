//! Theme system for the TUI.
//!
//! Provides semantic color roles that map to ratatui `Style` values.
//! The `ThemeVariant` enum selects between Dark and Light palettes,
//! and `StyleMap` resolves role names to concrete styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

// ============================================================================
// Theme Variant
// ============================================================================

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name from a string (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    /// Human-readable name for status display.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

// ============================================================================
// Color Palette: semantic roles to Style
// ============================================================================

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Category tabs / search bar --
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub search_editing: Style,
    pub search_idle: Style,

    // -- Book list --
    pub book_title: Style,
    pub book_selected: Style,
    pub book_author: Style,
    pub book_year: Style,
    pub match_highlight: Style,
    pub list_footer: Style,
    pub list_error: Style,

    // -- Detail overlay --
    pub detail_heading: Style,
    pub detail_label: Style,
    pub detail_body: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            tab_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::Gray),
            search_editing: Style::default().fg(Color::Yellow),
            search_idle: Style::default().fg(Color::DarkGray),

            book_title: Style::default().add_modifier(Modifier::BOLD),
            book_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            book_author: Style::default().fg(Color::Cyan),
            book_year: Style::default().fg(Color::DarkGray),
            match_highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            list_footer: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            list_error: Style::default().fg(Color::Red),

            detail_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_label: Style::default().fg(Color::Yellow),
            detail_body: Style::default(),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        Self {
            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),
            search_editing: Style::default().fg(Color::Magenta),
            search_idle: Style::default().fg(Color::DarkGray),

            book_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            book_selected: Style::default().bg(Color::Blue).fg(Color::White),
            book_author: Style::default().fg(Color::Blue),
            book_year: Style::default().fg(Color::DarkGray),
            match_highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            list_footer: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            list_error: Style::default().fg(Color::Red),

            detail_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            detail_label: Style::default().fg(Color::Magenta),
            detail_body: Style::default().fg(Color::Black),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
        }
    }
}

// ============================================================================
// Style Map: string-keyed lookup
// ============================================================================

/// Role-name lookup (e.g. `"match_highlight"`) built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

/// All semantic role names, in declaration order.
const ROLE_NAMES: [&str; 17] = [
    "tab_active",
    "tab_inactive",
    "search_editing",
    "search_idle",
    "book_title",
    "book_selected",
    "book_author",
    "book_year",
    "match_highlight",
    "list_footer",
    "list_error",
    "detail_heading",
    "detail_label",
    "detail_body",
    "status_bar",
    "panel_border",
    "panel_border_focused",
];

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        let styles: [Style; 17] = [
            p.tab_active,
            p.tab_inactive,
            p.search_editing,
            p.search_idle,
            p.book_title,
            p.book_selected,
            p.book_author,
            p.book_year,
            p.match_highlight,
            p.list_footer,
            p.list_error,
            p.detail_heading,
            p.detail_label,
            p.detail_body,
            p.status_bar,
            p.panel_border,
            p.panel_border_focused,
        ];

        let map = ROLE_NAMES.iter().copied().zip(styles).collect();
        Self { map }
    }

    /// Resolve a role name to its `Style`. Returns `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================
