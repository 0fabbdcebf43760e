//! Modal overlays drawn above the active panel.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;
use crate::theme;

/// Single-line text prompt with a block cursor.
pub fn render_input(f: &mut Frame, area: Rect, title: &str, buffer: &str) {
    let mut popup = centered_rect(60, 30, area);
    popup.height = popup.height.clamp(3, 5);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(format!(" {title} "))
        .title_style(theme::accent_bold());

    let lines = vec![
        Line::from(vec![
            Span::styled("> ", theme::accent()),
            Span::raw(buffer),
            Span::styled("█", theme::accent()),
        ]),
        Line::styled("Enter: apply  Esc: cancel", theme::muted()),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
