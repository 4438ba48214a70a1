//! Render functions for the TUI.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame,
};

use super::{books, detail, help, search, status, tabs};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 12;

/// Main render dispatch function.
///
/// Layout top to bottom: category tabs, search bar, book list, status bar.
/// Detail and help overlays are drawn over the top.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        // Nothing is on screen, so nothing counts as near the bottom.
        app.set_visible_rows(0);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    tabs::render(f, app, chunks[0]);
    search::render(f, app, chunks[1]);
    books::render(f, app, chunks[2]);
    status::render(f, app, chunks[3]);

    if app.detail.is_some() {
        detail::render(f, app);
    }

    if app.show_help {
        help::render(f, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BookRecord, CatalogClient};
    use crate::config::Config;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn test_app() -> App {
        let client = CatalogClient::new("https://openlibrary.org", Duration::from_secs(5)).unwrap();
        App::new(client, &Config::default()).unwrap()
    }

    fn rec(n: usize) -> BookRecord {
        BookRecord {
            id: format!("/works/OL{}W", n),
            title: format!("Emma volume {}", n),
            authors: vec!["Jane Austen".into()],
            cover_image_id: None,
            subjects: None,
            first_publish_year: Some(1815),
            detail_key: Some(format!("/works/OL{}W", n)),
            subtitle: None,
            first_sentence: None,
        }
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_render_sets_visible_rows() {
        let mut app = test_app();
        let ticket = app.refresh_filter().unwrap();
        app.handle_page_loaded(&ticket, Ok((0..40).map(rec).collect()));

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        // 24 rows - tabs(2) - search(3) - status(1) - borders(2) - footer(1)
        assert_eq!(app.list_visible_rows, 15);
        let text = screen(&terminal);
        assert!(text.contains("Emma volume 0"));
        assert!(text.contains("Fiction"));
        assert!(!text.contains("Emma volume 15"));
    }

    #[test]
    fn test_render_loading_footer_and_overlay() {
        let mut app = test_app();
        app.refresh_filter().unwrap();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen(&terminal).contains("Loading books..."));

        app.show_help = true;
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen(&terminal).contains("Help"));
    }

    #[test]
    fn test_tiny_terminal_disables_trigger() {
        let mut app = test_app();
        let ticket = app.refresh_filter().unwrap();
        app.handle_page_loaded(&ticket, Ok((0..3).map(rec).collect()));

        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert_eq!(app.list_visible_rows, 0);
        assert!(app.poll_near_bottom().is_none());
    }
}
