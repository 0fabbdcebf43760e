//! Option chain panel: expiry selector, CE/PE toggle and the Greeks table.

use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

use optdash_core::domain::{OptionQuote, OptionSide};
use optdash_core::present::{format_chain_iv, format_greek};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let dive = app.deep_dive.as_ref();
    if super::render_unready(f, area, app, dive.map(|d| &d.chain)) {
        return;
    }
    let Some(dive) = dive else {
        return;
    };
    let Some(view) = dive.chain.ready() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(area);

    let selector = vec![
        expiry_line(&dive.expiries, app.expiry_index),
        side_line(app.chain_side),
    ];
    f.render_widget(Paragraph::new(selector), chunks[0]);

    let quotes = view.side(app.chain_side);
    if quotes.is_empty() {
        super::render_message(
            f,
            chunks[1],
            vec![Line::styled(
                format!(
                    "No {} contracts listed for {}.",
                    app.chain_side.suffix(),
                    view.expiry
                ),
                theme::muted(),
            )],
        );
        return;
    }

    let atm = nearest_strike(quotes, dive.price);
    let header = Row::new(vec![
        "Strike", "LTP", "IV", "Delta", "Theta", "Gamma", "Vega", "OI", "Volume",
    ])
    .style(theme::accent_bold());

    let rows: Vec<Row> = quotes
        .iter()
        .map(|q| {
            let row = quote_row(q);
            if Some(q.strike) == atm {
                row.style(theme::accent().add_modifier(Modifier::BOLD))
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Min(8),
    ];
    f.render_widget(Table::new(rows, widths).header(header), chunks[1]);
}

fn expiry_line(expiries: &[NaiveDate], selected: usize) -> Line<'static> {
    let mut spans = vec![Span::styled("Expiry ", theme::secondary())];
    for (i, date) in expiries.iter().enumerate() {
        let style = if i == selected {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::muted()
        };
        spans.push(Span::styled(format!(" {} ", date.format("%d-%b-%Y")), style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("  [ ] to change", theme::muted()));
    Line::from(spans)
}

fn side_line(side: OptionSide) -> Line<'static> {
    let tab = |s: OptionSide, key: char| {
        let style = if s == side {
            theme::accent_bold().add_modifier(Modifier::REVERSED)
        } else {
            theme::muted()
        };
        Span::styled(format!(" {} ({key}) ", s.suffix()), style)
    };
    Line::from(vec![
        Span::styled("Side   ", theme::secondary()),
        tab(OptionSide::Call, 'c'),
        Span::raw(" "),
        tab(OptionSide::Put, 'p'),
    ])
}

fn quote_row(q: &OptionQuote) -> Row<'static> {
    Row::new(vec![
        Cell::from(format!("{:.2}", q.strike)),
        Cell::from(format!("{:.2}", q.last_price)),
        Cell::from(format_chain_iv(q.implied_vol)),
        Cell::from(Span::styled(format_greek(q.delta), theme::signed_style(q.delta))),
        Cell::from(Span::styled(format_greek(q.theta), theme::signed_style(q.theta))),
        Cell::from(format_greek(q.gamma)),
        Cell::from(format_greek(q.vega)),
        Cell::from(q.open_interest.to_string()),
        Cell::from(q.volume.to_string()),
    ])
}

fn nearest_strike(quotes: &[OptionQuote], spot: f64) -> Option<f64> {
    quotes
        .iter()
        .map(|q| q.strike)
        .min_by(|a, b| (a - spot).abs().total_cmp(&(b - spot).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(strike: f64) -> OptionQuote {
        OptionQuote {
            strike,
            last_price: 1.0,
            implied_vol: 0.2,
            delta: 0.5,
            theta: -0.1,
            gamma: 0.01,
            vega: 0.1,
            open_interest: 0,
            volume: 0,
        }
    }

    #[test]
    fn nearest_strike_picks_closest() {
        let quotes = [quote(90.0), quote(100.0), quote(110.0)];
        assert_eq!(nearest_strike(&quotes, 103.0), Some(100.0));
        assert_eq!(nearest_strike(&quotes, 200.0), Some(110.0));
        assert_eq!(nearest_strike(&[], 100.0), None);
    }
}
