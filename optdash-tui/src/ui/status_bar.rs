//! Bottom status bar: panel hints and the last status message.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    spans.push(Span::styled(
        " 1:Scan 2:Tech 3:Idea 4:Chain 5:Help",
        theme::muted(),
    ));
    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!("{} [{}]", app.ticker, app.dashboard.provider_name()),
        theme::neutral(),
    ));
    spans.push(Span::raw(" | "));

    let style = match app.status_level {
        StatusLevel::Info => theme::accent(),
        StatusLevel::Warning => theme::warning(),
        StatusLevel::Error => theme::negative(),
    };
    spans.push(Span::styled(app.status_message.as_str(), style));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
