//! Suggestion panel: ATM IV, the chosen strategy and why.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use optdash_core::Section;
use optdash_core::analysis::IvRegime;
use optdash_core::present::{
    bias_label, format_iv_pct, format_price, headline, rationale, section_message, DISCLAIMER,
};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(dive) = app.deep_dive.as_ref() else {
        super::render_unready::<()>(f, area, app, None);
        return;
    };
    let config = app.dashboard.config();

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{}  ", dive.ticker), theme::accent_bold()),
        Span::raw(format_price(Some(dive.price), &config.display.currency)),
    ])];

    match &dive.atm_iv {
        Section::Ready(iv) => {
            let regime = match IvRegime::classify(*iv, &config.thresholds.iv) {
                IvRegime::High => "high",
                IvRegime::Moderate => "moderate",
                IvRegime::Low => "low",
            };
            lines.push(Line::from(vec![
                Span::styled("ATM IV  ", theme::secondary()),
                Span::styled(
                    format_iv_pct(Some(*iv)),
                    theme::iv_style(*iv, &config.thresholds.iv),
                ),
                Span::styled(format!("  ({regime})"), theme::muted()),
            ]));
        }
        other => {
            let msg = section_message(other).unwrap_or_default();
            lines.push(Line::styled(format!("ATM IV  {msg}"), theme::muted()));
        }
    }
    lines.push(Line::raw(""));

    match &dive.suggestion {
        Section::Ready(suggestion) => {
            let style = theme::bias_style(suggestion.bias());
            lines.push(Line::styled(headline(suggestion), style));
            lines.push(Line::styled(
                format!("Bias: {}", bias_label(suggestion.bias())),
                style,
            ));
            lines.push(Line::raw(""));
            lines.push(Line::raw(rationale(suggestion)));
        }
        other => {
            let msg = section_message(other).unwrap_or_default();
            lines.push(Line::styled("No suggestion available.", theme::warning()));
            lines.push(Line::styled(msg, theme::muted()));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(DISCLAIMER, theme::warning()));

    super::render_message(f, area, lines);
}
