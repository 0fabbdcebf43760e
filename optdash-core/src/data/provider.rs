//! Provider traits and structured error types.
//!
//! The traits abstract over data sources (Yahoo Finance, synthetic) so the
//! scanner and deep dive can be driven by a live feed or a mock in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{OptionChain, OptionQuote, OptionSide, PriceBar};
use crate::scanner::ScanRow;

/// Structured error types for data operations.
///
/// Displayable in both CLI and TUI contexts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no option chain for {symbol} expiring {expiry}")]
    ExpiryNotFound { symbol: String, expiry: NaiveDate },

    #[error("no spot price for {symbol}")]
    NoSpotPrice { symbol: String },

    #[error("hard stop: data provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("data error: {0}")]
    Other(String),
}

/// Current quote fields used by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Last traded price; 0 when the provider has none.
    pub price: f64,
    pub average_volume: f64,
    pub volume: f64,
}

/// Price, volume and option-chain source.
pub trait MarketDataProvider {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn quote(&self, ticker: &str) -> Result<Quote, DataError>;

    /// Listed option expiries, nearest first. Empty when the ticker has no options.
    fn expiries(&self, ticker: &str) -> Result<Vec<NaiveDate>, DataError>;

    fn chain(&self, ticker: &str, expiry: NaiveDate) -> Result<OptionChain, DataError>;
}

/// Daily OHLCV history source.
pub trait HistoryProvider {
    /// Bars covering the last `lookback_days` calendar days, oldest first.
    /// Short or empty results are valid.
    fn history(&self, ticker: &str, lookback_days: u32) -> Result<Vec<PriceBar>, DataError>;
}

/// Option rows enriched with Greeks for one expiry and side.
pub trait GreeksProvider {
    fn greeks(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        side: OptionSide,
        risk_free_rate: f64,
    ) -> Result<Vec<OptionQuote>, DataError>;
}

/// A source that serves both market data and history.
pub trait DashboardProvider: MarketDataProvider + HistoryProvider {}

impl<T: MarketDataProvider + HistoryProvider> DashboardProvider for T {}

/// Progress callback for the multi-ticker scan.
pub trait ScanProgress {
    fn on_start(&self, ticker: &str, index: usize, total: usize);

    fn on_complete(&self, row: &ScanRow, index: usize, total: usize);

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Progress reporter that prints to stderr, keeping stdout for results.
pub struct StderrProgress;

impl ScanProgress for StderrProgress {
    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        eprintln!("[{}/{}] Scanning {ticker}...", index + 1, total);
    }

    fn on_complete(&self, row: &ScanRow, _index: usize, _total: usize) {
        match &row.error {
            None => eprintln!("  OK: {}", row.ticker),
            Some(e) => eprintln!("  FAIL: {}: {e}", row.ticker),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        eprintln!("Scan complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Silent progress reporter.
pub struct NoProgress;

impl ScanProgress for NoProgress {
    fn on_start(&self, _ticker: &str, _index: usize, _total: usize) {}

    fn on_complete(&self, _row: &ScanRow, _index: usize, _total: usize) {}

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}
