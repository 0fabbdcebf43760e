//! Market data: provider traits, the Yahoo Finance client, and a
//! deterministic synthetic source for offline use.

pub mod circuit_breaker;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use provider::{
    DashboardProvider, DataError, GreeksProvider, HistoryProvider, MarketDataProvider,
    NoProgress, Quote, ScanProgress, StderrProgress,
};
pub use synthetic::SyntheticProvider;
pub use yahoo::YahooProvider;
