use crate::app::App;
use crate::catalog::BookRecord;
use crate::util::{display_width, highlight_ranges, single_line, truncate_to_width};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use super::loop_runner::SPINNER_FRAMES;

const SPINNER: [&str; SPINNER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the book list with its loading footer.
///
/// Records how many rows fit so scrolling and the near-bottom trigger use
/// the real viewport.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if app.search_mode {
            app.style("panel_border")
        } else {
            app.style("panel_border_focused")
        })
        .title(list_title(app));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    app.set_visible_rows(chunks[0].height as usize);

    let width = chunks[0].width as usize;
    let term = app.feed.state().active_signature().map(|s| s.search_term()).unwrap_or("");
    let highlight = app.style("match_highlight");

    let items: Vec<ListItem> = app
        .feed
        .items()
        .iter()
        .enumerate()
        .skip(app.list_scroll)
        .take(app.list_visible_rows)
        .map(|(i, book)| {
            let line = book_line(app, book, term, width, highlight);
            if i == app.selected {
                ListItem::new(line).style(app.style("book_selected"))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    f.render_widget(List::new(items), chunks[0]);
    f.render_widget(Paragraph::new(footer_line(app)), chunks[1]);
}

fn list_title(app: &App) -> String {
    let state = app.feed.state();
    match state.active_signature() {
        Some(sig) if !sig.search_term().is_empty() => {
            format!(" Books matching \"{}\" ({}) ", sig.search_term(), state.len())
        }
        _ => format!(" {} ({}) ", app.category.label(), state.len()),
    }
}

fn book_line(app: &App, book: &BookRecord, term: &str, width: usize, highlight: Style) -> Line<'static> {
    let suffix = match book.first_publish_year {
        Some(year) => format!("  {}  {}", single_line(&book.author_line()), year),
        None => format!("  {}", single_line(&book.author_line())),
    };

    // Title keeps at least half the row; the author/year suffix gives way.
    let title_room = width.saturating_sub(display_width(&suffix)).max(width / 2);
    let title = single_line(&book.title);
    let title = truncate_to_width(&title, title_room).into_owned();
    let suffix_room = width.saturating_sub(display_width(&title));
    let suffix = truncate_to_width(&suffix, suffix_room).into_owned();

    let mut spans = title_spans(&title, term, app.style("book_title"), highlight);
    spans.push(Span::styled(suffix, app.style("book_author")));
    Line::from(spans)
}

/// Split `title` into plain and highlighted spans for each match of `term`.
pub(super) fn title_spans(title: &str, term: &str, base: Style, highlight: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;
    for range in highlight_ranges(title, term) {
        if range.start > last {
            spans.push(Span::styled(title[last..range.start].to_string(), base));
        }
        spans.push(Span::styled(title[range.clone()].to_string(), highlight));
        last = range.end;
    }
    if last < title.len() || spans.is_empty() {
        spans.push(Span::styled(title[last..].to_string(), base));
    }
    spans
}

fn footer_line(app: &App) -> Line<'static> {
    let state = app.feed.state();
    if state.in_flight() {
        let frame = SPINNER[app.spinner_frame % SPINNER_FRAMES];
        let text = if state.is_empty() {
            format!("{} Loading books...", frame)
        } else {
            format!("{} Loading more books...", frame)
        };
        return Line::from(Span::styled(text, app.style("list_footer")));
    }
    if let Some(failure) = &app.last_failure {
        return Line::from(Span::styled(failure.message.clone(), app.style("list_error")));
    }
    if state.is_exhausted() {
        let text = if state.is_empty() { "No books found" } else { "End of results" };
        return Line::from(Span::styled(text, app.style("list_footer")));
    }
    Line::default()
}
