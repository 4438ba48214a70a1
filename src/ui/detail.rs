//! Detail overlay for the selected book.

use crate::app::App;
use crate::util::strip_control_chars;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::help::centered_rect;

pub fn render(f: &mut Frame, app: &App) {
    let Some(overlay) = &app.detail else {
        return;
    };

    let area = centered_rect(70, 70, f.area());
    if area.width < 20 || area.height < 8 {
        return;
    }
    f.render_widget(Clear, area);

    let view = overlay.view();
    let label = app.style("detail_label");
    let body = app.style("detail_body");

    let field = |name: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<16}", name), label),
            Span::styled(value, body),
        ])
    };

    let mut lines = vec![
        Line::from(Span::styled(strip_control_chars(&view.title).into_owned(), app.style("detail_heading"))),
        Line::default(),
        field("Authors", strip_control_chars(&view.authors).into_owned()),
        field("First published", view.first_published.clone()),
        field("Subjects", strip_control_chars(&view.subjects).into_owned()),
        field("Cover", view.cover_url.clone()),
    ];
    if let Some(url) = app.current_page_url() {
        lines.push(field("Catalog page", url));
    }
    lines.push(Line::default());
    if overlay.loading {
        lines.push(Line::from(Span::styled("Loading details...", app.style("list_footer"))));
    } else {
        lines.push(Line::from(Span::styled(strip_control_chars(&view.description).into_owned(), body)));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Book Details "),
        );

    f.render_widget(paragraph, area);

    let hint = Line::from(Span::styled(" Esc back, o open in browser ", app.style("detail_label")));
    let hint_area = Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(1),
        width: area.width.saturating_sub(2),
        height: 1,
    };
    f.render_widget(Paragraph::new(hint), hint_area);
}
