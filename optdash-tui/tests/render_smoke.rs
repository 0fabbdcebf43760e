//! Render every panel against the synthetic provider into a test backend.

use chrono::NaiveDate;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use optdash_core::config::DashboardConfig;
use optdash_core::data::SyntheticProvider;
use optdash_core::Dashboard;
use optdash_tui::app::{Overlay, Panel};
use optdash_tui::{ui, AppState};

fn loaded_app() -> AppState {
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let dashboard = Dashboard::new(
        Box::new(SyntheticProvider::new(as_of)),
        DashboardConfig::default(),
    )
    .with_as_of(as_of);
    let mut app = AppState::new(dashboard);
    app.process_pending();
    app
}

fn render(app: &AppState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();
    let buffer = terminal.backend().buffer();
    let mut text = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            text.push_str(buffer[(x, y)].symbol());
        }
        text.push('\n');
    }
    text
}

#[test]
fn scanner_lists_watchlist() {
    let app = loaded_app();
    let screen = render(&app);
    assert!(screen.contains("Scanner [1]"));
    for ticker in &app.scan_tickers {
        assert!(screen.contains(ticker.as_str()), "missing {ticker}");
    }
    assert!(screen.contains("ATM IV (%)"));
}

#[test]
fn technicals_show_status_summary() {
    let mut app = loaded_app();
    app.active_panel = Panel::Technicals;
    let screen = render(&app);
    assert!(screen.contains("Technicals [2]"));
    assert!(screen.contains("RELIANCE.NS"));
    assert!(screen.contains("RSI"));
    assert!(screen.contains("MACD"));
}

#[test]
fn suggestion_shows_strategy_and_disclaimer() {
    let mut app = loaded_app();
    app.active_panel = Panel::Suggestion;
    let screen = render(&app);
    assert!(screen.contains("Strategy: "));
    assert!(screen.contains("Disclaimer"));
}

#[test]
fn chain_shows_greeks_for_both_sides() {
    let mut app = loaded_app();
    app.active_panel = Panel::Chain;
    let calls = render(&app);
    assert!(calls.contains("Delta"));
    assert!(calls.contains("Theta"));

    app.chain_side = optdash_core::domain::OptionSide::Put;
    let puts = render(&app);
    assert!(puts.contains("PE (p)"));
    assert!(puts.contains("Vega"));
}

#[test]
fn help_lists_keys() {
    let mut app = loaded_app();
    app.active_panel = Panel::Help;
    let screen = render(&app);
    assert!(screen.contains("Edit scanner watchlist"));
}

#[test]
fn input_overlay_draws_buffer() {
    let mut app = loaded_app();
    app.start_edit(Overlay::EditTicker);
    let screen = render(&app);
    assert!(screen.contains("Deep-dive ticker"));
    assert!(screen.contains("> RELIANCE.NS"));
}

#[test]
fn failed_deep_dive_renders_message() {
    let mut app = loaded_app();
    app.deep_dive = None;
    app.deep_dive_error = Some("no price available for ZZZ".into());
    app.active_panel = Panel::Suggestion;
    let screen = render(&app);
    assert!(screen.contains("no price available for ZZZ"));
}

#[test]
fn tiny_terminal_does_not_panic() {
    let mut app = loaded_app();
    let mut terminal = Terminal::new(TestBackend::new(20, 5)).unwrap();
    for panel in Panel::ALL {
        app.active_panel = panel;
        terminal.draw(|f| ui::draw(f, &app)).unwrap();
    }
}
