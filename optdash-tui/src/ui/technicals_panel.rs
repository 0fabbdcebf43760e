//! Technicals panel: close with Bollinger bands, RSI with its guide levels,
//! and MACD line, signal and histogram.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Chart, Dataset, GraphType, Paragraph};

use optdash_core::analysis::{IndicatorSet, RsiThresholds, TechnicalReport};
use optdash_core::present::{format_price, status_summary};

use crate::app::AppState;
use crate::theme;

/// Most recent bars drawn in the charts.
const CHART_WINDOW: usize = 120;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let dive = app.deep_dive.as_ref();
    if super::render_unready(f, area, app, dive.map(|d| &d.technical)) {
        return;
    }
    let (Some(dive), Some(report)) = (dive, dive.and_then(|d| d.technical.ready())) else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Percentage(50),
            Constraint::Min(6),
        ])
        .split(area);

    let currency = &app.dashboard.config().display.currency;
    let price = format_price(Some(dive.price), currency);
    render_summary(f, chunks[0], &dive.ticker, price, report);

    let window = Window::last(&report.indicators, CHART_WINDOW);
    render_price(f, chunks[1], &report.indicators, &window);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);
    render_rsi(
        f,
        bottom[0],
        &report.indicators,
        &window,
        &app.dashboard.config().thresholds.rsi,
    );
    render_macd(f, bottom[1], &report.indicators, &window);
}

fn render_summary(
    f: &mut Frame,
    area: Rect,
    ticker: &str,
    price: String,
    report: &TechnicalReport,
) {
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{ticker}  "), theme::accent_bold()),
        Span::raw(price),
        Span::styled(format!("  as of {}", report.snapshot.date), theme::muted()),
    ])];
    let biases = [
        report.status.band.bias(),
        report.status.rsi.bias(),
        report.status.macd.bias(),
    ];
    for ((label, text), bias) in status_summary(&report.status).into_iter().zip(biases) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {label:<16}"), theme::secondary()),
            Span::styled(text, theme::bias_style(bias)),
        ]));
    }
    f.render_widget(Paragraph::new(lines), area);
}

/// Index range of the bars being charted.
struct Window {
    start: usize,
    end: usize,
}

impl Window {
    fn last(set: &IndicatorSet, size: usize) -> Self {
        let end = set.len();
        Self {
            start: end.saturating_sub(size),
            end,
        }
    }

    fn width(&self) -> f64 {
        (self.end - self.start).saturating_sub(1).max(1) as f64
    }

    /// Finite values in the window as chart points.
    fn points(&self, values: &[f64]) -> Vec<(f64, f64)> {
        values[self.start..self.end.min(values.len())]
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| (i as f64, v))
            .collect()
    }

    fn date_labels(&self, set: &IndicatorSet) -> Vec<Span<'static>> {
        let label = |i: usize| {
            set.dates
                .get(i)
                .map(|d| d.format("%d %b").to_string())
                .unwrap_or_default()
        };
        vec![
            Span::styled(label(self.start), theme::muted()),
            Span::styled(label(self.end.saturating_sub(1)), theme::muted()),
        ]
    }
}

fn y_bounds(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let (min, max) = series
        .iter()
        .flat_map(|s| s.iter().map(|&(_, y)| y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let padding = ((max - min).abs() * 0.05).max(1e-6);
    [min - padding, max + padding]
}

fn line<'a>(name: &'a str, color: Color, data: &'a [(f64, f64)]) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(symbols::Marker::Braille)
        .style(Style::default().fg(color))
        .graph_type(GraphType::Line)
        .data(data)
}

/// Unnamed horizontal reference line, kept out of the legend.
fn guide(color: Color, data: &[(f64, f64)]) -> Dataset<'_> {
    Dataset::default()
        .marker(symbols::Marker::Dot)
        .style(Style::default().fg(color))
        .graph_type(GraphType::Line)
        .data(data)
}

fn axes<'a>(
    chart: Chart<'a>,
    window: &Window,
    set: &IndicatorSet,
    y: [f64; 2],
    fmt: fn(f64) -> String,
) -> Chart<'a> {
    chart
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([0.0, window.width()])
                .labels(window.date_labels(set)),
        )
        .y_axis(
            Axis::default()
                .style(theme::muted())
                .bounds(y)
                .labels(vec![
                    Span::styled(fmt(y[0]), theme::muted()),
                    Span::styled(fmt(y[1]), theme::muted()),
                ]),
        )
}

fn render_price(f: &mut Frame, area: Rect, set: &IndicatorSet, window: &Window) {
    let close = window.points(&set.closes);
    let upper = window.points(&set.bollinger_upper);
    let middle = window.points(&set.bollinger_middle);
    let lower = window.points(&set.bollinger_lower);
    let y = y_bounds(&[close.as_slice(), upper.as_slice(), lower.as_slice()]);

    let datasets = vec![
        line("Upper", theme::NEGATIVE, &upper),
        line("SMA 20", theme::MUTED, &middle),
        line("Lower", theme::POSITIVE, &lower),
        line("Close", theme::ACCENT, &close),
    ];
    let chart = Chart::new(datasets);
    f.render_widget(axes(chart, window, set, y, |v| format!("{v:.0}")), area);
}

fn render_rsi(
    f: &mut Frame,
    area: Rect,
    set: &IndicatorSet,
    window: &Window,
    levels: &RsiThresholds,
) {
    let rsi = window.points(&set.rsi);
    let x_max = window.width();
    let overbought = [(0.0, levels.overbought), (x_max, levels.overbought)];
    let oversold = [(0.0, levels.oversold), (x_max, levels.oversold)];

    let datasets = vec![
        guide(theme::NEGATIVE, &overbought),
        guide(theme::POSITIVE, &oversold),
        line("RSI 14", theme::NEUTRAL, &rsi),
    ];
    let chart = Chart::new(datasets);
    f.render_widget(
        axes(chart, window, set, [0.0, 100.0], |v| format!("{v:.0}")),
        area,
    );
}

fn render_macd(f: &mut Frame, area: Rect, set: &IndicatorSet, window: &Window) {
    let macd = window.points(&set.macd_line);
    let signal = window.points(&set.macd_signal);
    let histogram = window.points(&set.macd_histogram);
    let zero = [(0.0, 0.0)];
    let y = y_bounds(&[
        macd.as_slice(),
        signal.as_slice(),
        histogram.as_slice(),
        zero.as_slice(),
    ]);

    let datasets = vec![
        Dataset::default()
            .name("Hist")
            .marker(symbols::Marker::Dot)
            .style(Style::default().fg(theme::MUTED))
            .graph_type(GraphType::Bar)
            .data(&histogram),
        line("MACD", theme::ACCENT, &macd),
        line("Signal", theme::WARNING, &signal),
    ];
    let chart = Chart::new(datasets);
    f.render_widget(axes(chart, window, set, y, |v| format!("{v:.2}")), area);
}
