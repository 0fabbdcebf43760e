//! Scanner panel: price, ATM IV and volume ratio per watchlist ticker.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Row, Table};

use optdash_core::analysis::IvThresholds;
use optdash_core::present::{format_iv_pct, format_price, format_volume_ratio, NOT_AVAILABLE};
use optdash_core::scanner::ScanRow;

use crate::app::AppState;
use crate::theme;

/// Volume above this multiple of the 3-month average is highlighted.
const UNUSUAL_VOLUME: f64 = 1.5;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    if app.scan_rows.is_empty() {
        super::render_message(
            f,
            area,
            vec![
                Line::styled("No scan results yet.", theme::muted()),
                Line::styled("Press s to edit the watchlist, r to reload.", theme::muted()),
            ],
        );
        return;
    }

    let config = app.dashboard.config();
    let currency = config.display.currency.as_str();
    let levels = &config.thresholds.iv;

    let header = Row::new(vec!["Ticker", "Price", "ATM IV (%)", "Stock Vol. Ratio", ""])
        .style(theme::accent_bold());

    let rows: Vec<Row> = app
        .scan_rows
        .iter()
        .map(|row| scan_row(row, currency, levels))
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Min(10),
    ];

    let table = Table::new(rows, widths).header(header).column_spacing(2);
    f.render_widget(table, area);
}

fn scan_row<'a>(
    row: &'a ScanRow,
    currency: &str,
    levels: &IvThresholds,
) -> Row<'a> {
    if let Some(err) = &row.error {
        return Row::new(vec![
            Cell::from(row.ticker.as_str()),
            Cell::from(Span::styled(NOT_AVAILABLE, theme::muted())),
            Cell::from(Span::styled(NOT_AVAILABLE, theme::muted())),
            Cell::from(Span::styled(NOT_AVAILABLE, theme::muted())),
            Cell::from(Span::styled(err.as_str(), theme::negative())),
        ]);
    }

    let iv_style = row
        .atm_iv_pct
        .map(|iv| theme::iv_style(iv, levels))
        .unwrap_or_else(theme::muted);
    let ratio_style = match row.volume_ratio {
        Some(r) if r >= UNUSUAL_VOLUME => theme::warning(),
        Some(_) => theme::secondary(),
        None => theme::muted(),
    };

    Row::new(vec![
        Cell::from(Span::styled(row.ticker.as_str(), theme::accent())),
        Cell::from(format_price(row.price, currency)),
        Cell::from(Span::styled(format_iv_pct(row.atm_iv_pct), iv_style)),
        Cell::from(Span::styled(
            format_volume_ratio(row.volume_ratio),
            ratio_style,
        )),
        Cell::from(""),
    ])
}
