use crate::app::App;
use crate::feed::CATEGORIES;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Render the category tab strip.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let titles: Vec<Line> = CATEGORIES.iter().map(|c| Line::from(c.label())).collect();

    let tabs = Tabs::new(titles)
        .select(app.category.index())
        .style(app.style("tab_inactive"))
        .highlight_style(app.style("tab_active"))
        .divider("|")
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(app.style("panel_border")),
        );

    f.render_widget(tabs, area);
}
