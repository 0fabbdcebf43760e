//! Application state for the TUI.
//!
//! Panels:
//! 1. Scanner: one row per watchlist ticker
//! 2. Technicals: price with Bollinger bands, RSI, MACD
//! 3. Suggestion: strategy headline, rationale, disclaimer
//! 4. Chain: Greek-enriched option chain for the selected expiry
//! 5. Help: keyboard shortcuts

use chrono::NaiveDate;
use tracing::{debug, info};

use optdash_core::data::NoProgress;
use optdash_core::domain::{normalize_ticker, parse_ticker_list, OptionSide};
use optdash_core::scanner::ScanRow;
use optdash_core::{Dashboard, DeepDive, Section};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Scanner,
    Technicals,
    Suggestion,
    Chain,
    Help,
}

impl Panel {
    pub const ALL: [Panel; 5] = [
        Panel::Scanner,
        Panel::Technicals,
        Panel::Suggestion,
        Panel::Chain,
        Panel::Help,
    ];

    pub fn index(&self) -> usize {
        match self {
            Panel::Scanner => 0,
            Panel::Technicals => 1,
            Panel::Suggestion => 2,
            Panel::Chain => 3,
            Panel::Help => 4,
        }
    }

    pub fn from_index(i: usize) -> Self {
        Self::ALL[i % Self::ALL.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Panel::Scanner => "Scanner",
            Panel::Technicals => "Technicals",
            Panel::Suggestion => "Suggestion",
            Panel::Chain => "Option Chain",
            Panel::Help => "Help",
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }
}

/// Modal text input drawn over the active panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Comma-separated scanner watchlist.
    EditScan,
    /// Deep-dive ticker.
    EditTicker,
}

impl Overlay {
    pub fn title(&self) -> &'static str {
        match self {
            Overlay::EditScan => "Scan tickers (comma separated)",
            Overlay::EditTicker => "Deep-dive ticker",
        }
    }
}

/// Work queued by input and run by the event loop after the next redraw, so
/// the status bar shows what is loading while the fetch blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Scan,
    DeepDive,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

pub struct AppState {
    pub dashboard: Dashboard,
    pub running: bool,
    pub active_panel: Panel,
    pub overlay: Option<Overlay>,
    pub input_buffer: String,

    pub scan_tickers: Vec<String>,
    pub scan_rows: Vec<ScanRow>,

    pub ticker: String,
    pub deep_dive: Option<DeepDive>,
    pub deep_dive_error: Option<String>,
    pub expiry_index: usize,
    pub chain_side: OptionSide,

    pub pending: Option<Refresh>,
    pub status_message: String,
    pub status_level: StatusLevel,
}

impl AppState {
    /// Initial state from the dashboard's configuration. Both views are
    /// queued for loading.
    pub fn new(dashboard: Dashboard) -> Self {
        let config = dashboard.config();
        let scan_tickers = config.scan.tickers.clone();
        let ticker = normalize_ticker(&config.deep_dive.ticker);
        Self {
            dashboard,
            running: true,
            active_panel: Panel::Scanner,
            overlay: None,
            input_buffer: String::new(),
            scan_tickers,
            scan_rows: Vec::new(),
            ticker,
            deep_dive: None,
            deep_dive_error: None,
            expiry_index: 0,
            chain_side: OptionSide::Call,
            pending: Some(Refresh::All),
            status_message: "Loading...".into(),
            status_level: StatusLevel::Info,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_level = StatusLevel::Info;
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_level = StatusLevel::Warning;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
        self.status_level = StatusLevel::Error;
    }

    pub fn request(&mut self, refresh: Refresh) {
        let what = match refresh {
            Refresh::Scan => "scan".to_string(),
            Refresh::DeepDive => self.ticker.clone(),
            Refresh::All => "scan and deep dive".to_string(),
        };
        self.set_status(format!("Loading {what}..."));
        self.pending = Some(refresh);
    }

    /// Run queued work, if any.
    pub fn process_pending(&mut self) {
        let Some(refresh) = self.pending.take() else {
            return;
        };
        debug!(?refresh, "processing refresh");
        match refresh {
            Refresh::Scan => self.refresh_scan(),
            Refresh::DeepDive => self.refresh_deep_dive(),
            Refresh::All => {
                self.refresh_scan();
                self.refresh_deep_dive();
            }
        }
    }

    /// Drop cached data and reload both views.
    pub fn force_refresh(&mut self) {
        self.dashboard.invalidate();
        self.request(Refresh::All);
    }

    fn refresh_scan(&mut self) {
        self.scan_rows = self.dashboard.scan(&self.scan_tickers, &NoProgress);
        let failed = self.scan_rows.iter().filter(|r| !r.is_ok()).count();
        if failed > 0 {
            self.set_warning(format!(
                "Scanned {} tickers, {failed} unavailable",
                self.scan_rows.len()
            ));
        } else {
            self.set_status(format!("Scanned {} tickers", self.scan_rows.len()));
        }
    }

    fn refresh_deep_dive(&mut self) {
        self.expiry_index = 0;
        match self.dashboard.deep_dive(&self.ticker) {
            Ok(dive) => {
                info!(ticker = %dive.ticker, "deep dive loaded");
                self.deep_dive_error = None;
                self.set_status(deep_dive_status(&dive));
                self.deep_dive = Some(dive);
            }
            Err(e) => {
                self.deep_dive = None;
                self.deep_dive_error = Some(e.to_string());
                self.set_error(e.to_string());
            }
        }
    }

    pub fn start_edit(&mut self, overlay: Overlay) {
        self.input_buffer = match overlay {
            Overlay::EditScan => self.scan_tickers.join(", "),
            Overlay::EditTicker => self.ticker.clone(),
        };
        self.overlay = Some(overlay);
    }

    pub fn cancel_edit(&mut self) {
        self.overlay = None;
        self.input_buffer.clear();
    }

    /// Apply the input buffer to whichever field the overlay edits.
    pub fn commit_edit(&mut self) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        let input = std::mem::take(&mut self.input_buffer);
        match overlay {
            Overlay::EditScan => {
                let tickers = parse_ticker_list(&input);
                if tickers.is_empty() {
                    self.set_warning("Watchlist unchanged: no tickers entered");
                    return;
                }
                self.scan_tickers = tickers;
                self.request(Refresh::Scan);
            }
            Overlay::EditTicker => {
                let ticker = normalize_ticker(&input);
                if ticker.is_empty() {
                    self.set_warning("Please enter a stock ticker.");
                    return;
                }
                self.ticker = ticker;
                self.request(Refresh::DeepDive);
            }
        }
    }

    pub fn selected_expiry(&self) -> Option<NaiveDate> {
        self.deep_dive
            .as_ref()
            .and_then(|d| d.expiries.get(self.expiry_index))
            .copied()
    }

    /// Step the chain's expiry by `delta`, clamped to the listed range, and
    /// load that chain.
    pub fn select_expiry(&mut self, delta: isize) {
        let Some(dive) = self.deep_dive.as_mut() else {
            return;
        };
        if dive.expiries.is_empty() {
            return;
        }
        let last = dive.expiries.len() - 1;
        let index = self.expiry_index.saturating_add_signed(delta).min(last);
        if index == self.expiry_index {
            return;
        }
        self.expiry_index = index;
        let expiry = dive.expiries[index];
        dive.chain = self.dashboard.chain_for(dive, expiry);
        if dive.chain.is_ready() {
            self.set_status(format!("Showing {expiry} expiry"));
        } else {
            self.set_warning(format!("No chain for {expiry}"));
        }
    }

    pub fn toggle_side(&mut self, side: OptionSide) {
        self.chain_side = side;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

fn deep_dive_status(dive: &DeepDive) -> String {
    match &dive.suggestion {
        Section::Ready(s) => format!("{}: {}", dive.ticker, s.label()),
        _ => format!("{}: no suggestion available", dive.ticker),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optdash_core::config::DashboardConfig;
    use optdash_core::data::SyntheticProvider;
    use proptest::prelude::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    fn app() -> AppState {
        let provider = SyntheticProvider::new(as_of());
        let dashboard =
            Dashboard::new(Box::new(provider), DashboardConfig::default()).with_as_of(as_of());
        AppState::new(dashboard)
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Scanner.next(), Panel::Technicals);
        assert_eq!(Panel::Help.next(), Panel::Scanner);
        assert_eq!(Panel::Scanner.prev(), Panel::Help);
    }

    proptest! {
        #[test]
        fn panel_prev_undoes_next(i in 0usize..5) {
            let panel = Panel::from_index(i);
            prop_assert_eq!(panel.next().prev(), panel);
            prop_assert_eq!(panel.index(), i);
        }
    }

    #[test]
    fn starts_with_everything_queued() {
        let app = app();
        assert_eq!(app.pending, Some(Refresh::All));
        assert_eq!(app.scan_tickers.len(), 6);
        assert_eq!(app.ticker, "RELIANCE.NS");
    }

    #[test]
    fn processing_loads_both_views() {
        let mut app = app();
        app.process_pending();
        assert!(app.pending.is_none());
        assert_eq!(app.scan_rows.len(), 6);
        let dive = app.deep_dive.as_ref().expect("deep dive loaded");
        assert_eq!(dive.ticker, "RELIANCE.NS");
        assert_eq!(app.selected_expiry(), dive.expiries.first().copied());
    }

    #[test]
    fn expiry_selection_clamps() {
        let mut app = app();
        app.process_pending();
        app.select_expiry(-1);
        assert_eq!(app.expiry_index, 0);
        app.select_expiry(1);
        assert_eq!(app.expiry_index, 1);
        let second = app.selected_expiry().unwrap();
        match &app.deep_dive.as_ref().unwrap().chain {
            Section::Ready(view) => assert_eq!(view.expiry, second),
            other => panic!("expected chain, got {other:?}"),
        }
        app.select_expiry(100);
        assert_eq!(app.expiry_index, 3);
    }

    #[test]
    fn commit_ticker_edit_queues_deep_dive() {
        let mut app = app();
        app.pending = None;
        app.start_edit(Overlay::EditTicker);
        assert_eq!(app.input_buffer, "RELIANCE.NS");
        app.input_buffer = " infy.ns ".into();
        app.commit_edit();
        assert_eq!(app.ticker, "INFY.NS");
        assert_eq!(app.pending, Some(Refresh::DeepDive));
        assert!(app.overlay.is_none());
    }

    #[test]
    fn blank_ticker_is_rejected() {
        let mut app = app();
        app.pending = None;
        app.start_edit(Overlay::EditTicker);
        app.input_buffer = "   ".into();
        app.commit_edit();
        assert_eq!(app.ticker, "RELIANCE.NS");
        assert!(app.pending.is_none());
        assert_eq!(app.status_level, StatusLevel::Warning);
    }

    #[test]
    fn commit_scan_edit_replaces_watchlist() {
        let mut app = app();
        app.pending = None;
        app.start_edit(Overlay::EditScan);
        app.input_buffer = "tcs.ns, sbin.ns".into();
        app.commit_edit();
        assert_eq!(app.scan_tickers, vec!["TCS.NS", "SBIN.NS"]);
        assert_eq!(app.pending, Some(Refresh::Scan));
    }
}
