//! Keybinding registry: maps actions to key events with config overrides.
//!
//! Bindings are data, not match arms, so `[keybindings]` in config.toml can
//! rebind any action.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    PageDown,
    PageUp,
    JumpTop,
    JumpBottom,
    NextCategory,
    PrevCategory,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    ClearSearch,
    OpenDetail,
    CloseDetail,
    OpenInBrowser,
    LoadMore,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Next book",
            Self::NavUp => "Previous book",
            Self::PageDown => "Page down",
            Self::PageUp => "Page up",
            Self::JumpTop => "First book",
            Self::JumpBottom => "Last loaded book",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::EnterSearch => "Search by title",
            Self::ExitSearch => "Clear and close search",
            Self::CommitSearch => "Run search now",
            Self::ClearSearch => "Clear search term",
            Self::OpenDetail => "Show book details",
            Self::CloseDetail => "Close details",
            Self::OpenInBrowser => "Open on Open Library",
            Self::LoadMore => "Load next page / retry",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    List,
    Search,
    Detail,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "General",
            Self::List => "Book list",
            Self::Search => "Search bar",
            Self::Detail => "Details",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn ch(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Shift is implied by the character itself ('G', '?') and by BackTab,
    /// so it is dropped before lookup.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => {
                Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT))
            }
            _ => self,
        }
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "BackTab", "Up", "Down", "Home", "End", "PageDown"
/// - Modifier combos: "Ctrl+d"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return match chars.next() {
            None => Some(KeySpec::ctrl(c)),
            Some(_) => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" | "shift+tab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12).contains(&n).then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::ch(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// in a specific context fall back to Global.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen.
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Action::*;
        use Context::*;

        let defaults = [
            // === Global ===
            (Global, KeySpec::ch('q'), Quit),
            (Global, KeySpec::ch('j'), NavDown),
            (Global, KeySpec::plain(KeyCode::Down), NavDown),
            (Global, KeySpec::ch('k'), NavUp),
            (Global, KeySpec::plain(KeyCode::Up), NavUp),
            (Global, KeySpec::ctrl('d'), PageDown),
            (Global, KeySpec::plain(KeyCode::PageDown), PageDown),
            (Global, KeySpec::ctrl('u'), PageUp),
            (Global, KeySpec::plain(KeyCode::PageUp), PageUp),
            (Global, KeySpec::ch('g'), JumpTop),
            (Global, KeySpec::plain(KeyCode::Home), JumpTop),
            (Global, KeySpec::ch('G'), JumpBottom),
            (Global, KeySpec::plain(KeyCode::End), JumpBottom),
            (Global, KeySpec::plain(KeyCode::Tab), NextCategory),
            (Global, KeySpec::ch('l'), NextCategory),
            (Global, KeySpec::plain(KeyCode::Right), NextCategory),
            (Global, KeySpec::plain(KeyCode::BackTab), PrevCategory),
            (Global, KeySpec::ch('h'), PrevCategory),
            (Global, KeySpec::plain(KeyCode::Left), PrevCategory),
            (Global, KeySpec::ch('/'), EnterSearch),
            (Global, KeySpec::ch('o'), OpenInBrowser),
            (Global, KeySpec::ch('t'), CycleTheme),
            (Global, KeySpec::ch('?'), ShowHelp),
            // === Book list ===
            (List, KeySpec::plain(KeyCode::Enter), OpenDetail),
            (List, KeySpec::plain(KeyCode::Esc), ClearSearch),
            (List, KeySpec::ch('r'), LoadMore),
            // === Detail overlay ===
            (Detail, KeySpec::plain(KeyCode::Esc), CloseDetail),
            (Detail, KeySpec::plain(KeyCode::Enter), CloseDetail),
            (Detail, KeySpec::ch('b'), CloseDetail),
            // === Search bar ===
            (Search, KeySpec::plain(KeyCode::Esc), ExitSearch),
            (Search, KeySpec::plain(KeyCode::Enter), CommitSearch),
        ];

        for (context, key, action) in defaults {
            self.bind(context, key, action);
        }
    }

    /// Apply user overrides from config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "load_more").
    /// Values are key strings (e.g., "q", "Ctrl+d", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key.normalized(), action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a given key in a given context.
    ///
    /// Tries the specific context first, then falls back to Global. The
    /// search bar does not fall back: printable keys there are text.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        if context != Context::Global && context != Context::Search {
            if let Some(&action) = self.lookup.get(&(Context::Global, key)) {
                return Some(action);
            }
        }

        None
    }

    /// Returns (context, key_display_string, action, description) tuples.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }

    /// First key bound to `action`, for hints in the status bar.
    pub fn key_hint(&self, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(_, _, a)| *a == action)
            .map(|(_, key, _)| format_key(key))
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action enum.
fn parse_action_name(name: &str) -> Option<Action> {
    match name.to_lowercase().replace('-', "_").as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "down" => Some(Action::NavDown),
        "nav_up" | "up" => Some(Action::NavUp),
        "page_down" => Some(Action::PageDown),
        "page_up" => Some(Action::PageUp),
        "jump_top" | "top" => Some(Action::JumpTop),
        "jump_bottom" | "bottom" => Some(Action::JumpBottom),
        "next_category" => Some(Action::NextCategory),
        "prev_category" | "previous_category" => Some(Action::PrevCategory),
        "enter_search" | "search" => Some(Action::EnterSearch),
        "exit_search" => Some(Action::ExitSearch),
        "commit_search" => Some(Action::CommitSearch),
        "clear_search" => Some(Action::ClearSearch),
        "open_detail" | "detail" => Some(Action::OpenDetail),
        "close_detail" => Some(Action::CloseDetail),
        "open_in_browser" | "open" => Some(Action::OpenInBrowser),
        "load_more" | "retry" => Some(Action::LoadMore),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
