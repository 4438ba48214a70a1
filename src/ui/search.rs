use crate::app::App;
use crate::util::{display_width, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::borrow::Cow;

/// Render the search bar, in edit mode or showing the applied term.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let room = area.width.saturating_sub(4) as usize;

    let (text, style): (Cow<'_, str>, _) = if app.search_mode {
        // Keep the cursor end visible for long input.
        let input = tail_to_width(&app.search_input, room.saturating_sub(1));
        (Cow::Owned(format!("{}_", input)), app.style("search_editing"))
    } else if app.search_term.is_empty() {
        (Cow::Borrowed("Press / to search by title"), app.style("search_idle"))
    } else {
        (truncate_to_width(&app.search_term, room), app.style("search_idle"))
    };

    let border = if app.search_mode {
        app.style("panel_border_focused")
    } else {
        app.style("panel_border")
    };

    let paragraph = Paragraph::new(Line::from(Span::styled(text, style))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search "),
    );
    f.render_widget(paragraph, area);
}

/// Longest suffix of `s` that fits in `columns`.
fn tail_to_width(s: &str, columns: usize) -> &str {
    let mut start = s.len();
    for (idx, _) in s.char_indices().rev() {
        if display_width(&s[idx..]) > columns {
            break;
        }
        start = idx;
    }
    &s[start..]
}
