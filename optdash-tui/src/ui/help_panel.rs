//! Help panel: keyboard shortcuts and a reading guide.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use optdash_core::present::DISCLAIMER;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let levels = &app.dashboard.config().thresholds;
    let lines = vec![
        section("Navigation"),
        key("1-5", "Jump to panel"),
        key("Tab / Shift-Tab", "Next / previous panel"),
        key("?", "This help"),
        key("q / Ctrl-C", "Quit"),
        Line::raw(""),
        section("Data"),
        key("s", "Edit scanner watchlist"),
        key("/", "Choose deep-dive ticker"),
        key("r", "Clear caches and reload"),
        Line::raw(""),
        section("Option Chain"),
        key("[ / ]", "Previous / next expiry"),
        key("c / p", "Show calls (CE) / puts (PE)"),
        Line::raw(""),
        section("Reading the suggestion"),
        Line::from(Span::styled(
            format!(
                "  IV above {:.0}% sells premium, below {:.0}% buys it, in between trades direction.",
                levels.iv.high, levels.iv.low
            ),
            theme::secondary(),
        )),
        Line::from(Span::styled(
            format!(
                "  RSI above {:.0} is overbought, below {:.0} oversold.",
                levels.rsi.overbought, levels.rsi.oversold
            ),
            theme::secondary(),
        )),
        Line::raw(""),
        Line::from(Span::styled(DISCLAIMER, theme::warning())),
    ];

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {title}"), theme::accent_bold()))
}

fn key(k: &str, desc: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {k:<18}"), theme::warning()),
        Span::raw(desc.to_string()),
    ])
}
