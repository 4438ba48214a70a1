use crate::app::App;
use crate::keybindings::Action;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.search_mode {
        Cow::Borrowed("Type to search | ESC clear | ENTER confirm")
    } else if app.detail.is_some() {
        Cow::Owned(hints(app, &[(Action::CloseDetail, "back"), (Action::OpenInBrowser, "open"), (Action::Quit, "quit")]))
    } else {
        Cow::Owned(hints(
            app,
            &[
                (Action::NextCategory, "category"),
                (Action::EnterSearch, "search"),
                (Action::OpenDetail, "details"),
                (Action::OpenInBrowser, "open"),
                (Action::ShowHelp, "help"),
                (Action::Quit, "quit"),
            ],
        ))
    };

    f.render_widget(Paragraph::new(text).style(app.style("status_bar")), area);
}

/// Hints built from the live bindings so overrides show up.
fn hints(app: &App, actions: &[(Action, &str)]) -> String {
    actions
        .iter()
        .filter_map(|(action, label)| {
            app.keybindings
                .key_hint(*action)
                .map(|key| format!("[{}] {}", key, label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
