//! Top-level UI layout: one full-size panel with a status bar.

pub mod chain_panel;
pub mod help_panel;
pub mod overlays;
pub mod scanner_panel;
pub mod status_bar;
pub mod suggestion_panel;
pub mod technicals_panel;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use optdash_core::Section;
use optdash_core::present::section_message;

use crate::app::{AppState, Panel};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_panel(f, main_area, app);
    status_bar::render(f, status_area, app);

    if let Some(overlay) = app.overlay {
        overlays::render_input(f, main_area, overlay.title(), &app.input_buffer);
    }
}

fn draw_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.active_panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Scanner => scanner_panel::render(f, inner, app),
        Panel::Technicals => technicals_panel::render(f, inner, app),
        Panel::Suggestion => suggestion_panel::render(f, inner, app),
        Panel::Chain => chain_panel::render(f, inner, app),
        Panel::Help => help_panel::render(f, inner, app),
    }
}

/// Placeholder text for a panel with nothing to draw.
pub(crate) fn render_message(f: &mut Frame, area: Rect, lines: Vec<Line>) {
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// Shared handling for deep-dive views: missing deep dive, a failed one, or
/// a section that did not compute. Returns `true` when it drew something.
pub(crate) fn render_unready<T>(
    f: &mut Frame,
    area: Rect,
    app: &AppState,
    section: Option<&Section<T>>,
) -> bool {
    if let Some(err) = &app.deep_dive_error {
        render_message(
            f,
            area,
            vec![
                Line::styled(err.as_str(), theme::negative()),
                Line::styled("Press / to choose another ticker.", theme::muted()),
            ],
        );
        return true;
    }
    let Some(section) = section else {
        render_message(
            f,
            area,
            vec![Line::styled(
                format!("Loading {}...", app.ticker),
                theme::muted(),
            )],
        );
        return true;
    };
    match section_message(section) {
        Some(msg) => {
            let style = match section {
                Section::Failed(_) => theme::negative(),
                _ => theme::warning(),
            };
            render_message(f, area, vec![Line::styled(msg, style)]);
            true
        }
        None => false,
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
