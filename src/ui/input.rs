//! Input handling for the TUI.
//!
//! Keys are resolved to actions through the keybinding registry using the
//! context of whatever currently has the keyboard: help overlay, search bar,
//! detail overlay, or the book list.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_in_browser, spawn_detail_load, spawn_page_fetch};
use super::Action;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    // Help overlay captures all keys while visible
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.search_mode {
        return Ok(handle_search_input(app, code, modifiers, event_tx));
    }

    if app.detail.is_some() {
        return Ok(handle_detail_input(app, code, modifiers));
    }

    Ok(handle_list_input(app, code, modifiers, event_tx))
}

/// Handle input while the help overlay is visible.
///
/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

fn handle_search_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match app.keybindings.action_for_key(code, modifiers, KbContext::Search) {
        Some(KbAction::ExitSearch) => {
            if let Some(ticket) = app.clear_search() {
                spawn_page_fetch(app, ticket, event_tx);
            }
        }
        Some(KbAction::CommitSearch) => {
            if let Some(ticket) = app.commit_search() {
                spawn_page_fetch(app, ticket, event_tx);
            }
        }
        Some(_) => {}
        None => match code {
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                app.push_search_char(c)
            }
            _ => {}
        },
    }
    Action::Continue
}

fn handle_detail_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match app.keybindings.action_for_key(code, modifiers, KbContext::Detail) {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::CloseDetail) => app.close_detail(),
        Some(KbAction::OpenInBrowser) => open_in_browser(app),
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => app.show_help = true,
        // List movement stays frozen behind the overlay.
        _ => {}
    }
    Action::Continue
}

fn handle_list_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let Some(action) = app.keybindings.action_for_key(code, modifiers, KbContext::List) else {
        return Action::Continue;
    };

    let ticket = match action {
        KbAction::Quit => return Action::Quit,
        KbAction::NavDown => {
            app.nav_down();
            None
        }
        KbAction::NavUp => {
            app.nav_up();
            None
        }
        KbAction::PageDown => {
            app.page_down();
            None
        }
        KbAction::PageUp => {
            app.page_up();
            None
        }
        KbAction::JumpTop => {
            app.jump_top();
            None
        }
        KbAction::JumpBottom => {
            app.jump_bottom();
            None
        }
        KbAction::NextCategory => app.next_category(),
        KbAction::PrevCategory => app.prev_category(),
        KbAction::EnterSearch => {
            app.enter_search();
            None
        }
        KbAction::ClearSearch | KbAction::ExitSearch => app.clear_search(),
        KbAction::CommitSearch => None,
        KbAction::OpenDetail => {
            if let Some(request) = app.open_detail() {
                spawn_detail_load(app, request, event_tx);
            }
            None
        }
        KbAction::CloseDetail => None,
        KbAction::OpenInBrowser => {
            open_in_browser(app);
            None
        }
        KbAction::LoadMore => app.load_more(),
        KbAction::CycleTheme => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
            None
        }
        KbAction::ShowHelp => {
            app.show_help = true;
            None
        }
    };

    if let Some(ticket) = ticket {
        spawn_page_fetch(app, ticket, event_tx);
    }
    Action::Continue
}
