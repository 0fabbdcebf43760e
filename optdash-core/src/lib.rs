//! optdash core: market scanner, technical classifier and option-strategy
//! suggestion engine.
//!
//! - Domain types (price bars, option contracts, tickers)
//! - Indicators (EMA, RSI, MACD, Bollinger Bands)
//! - Technical status classification and the suggestion decision table
//! - Data providers (Yahoo Finance, deterministic synthetic)
//! - Black-Scholes Greeks, TTL cache, configuration
//! - Dashboard session orchestrating scan and deep dive

pub mod analysis;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod greeks;
pub mod indicators;
pub mod present;
pub mod scanner;
pub mod section;

pub use dashboard::{ChainView, Dashboard, DeepDive, DeepDiveError};
pub use section::Section;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: value types handed to front-ends are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PriceBar>();
        require_sync::<domain::PriceBar>();
        require_send::<domain::OptionChain>();
        require_sync::<domain::OptionChain>();
        require_send::<domain::OptionQuote>();
        require_sync::<domain::OptionQuote>();

        require_send::<analysis::TechnicalReport>();
        require_sync::<analysis::TechnicalReport>();
        require_send::<analysis::Suggestion>();
        require_sync::<analysis::Suggestion>();

        require_send::<scanner::ScanRow>();
        require_sync::<scanner::ScanRow>();
        require_send::<DeepDive>();
        require_sync::<DeepDive>();

        require_send::<config::DashboardConfig>();
        require_sync::<config::DashboardConfig>();
        require_send::<data::CircuitBreaker>();
        require_sync::<data::CircuitBreaker>();
        require_send::<data::SyntheticProvider>();
        require_sync::<data::SyntheticProvider>();
    }

    /// The decision table is data: the dead Long Straddle rule is still listed.
    #[test]
    fn decision_table_lists_every_strategy() {
        for strategy in analysis::Strategy::ALL {
            assert!(analysis::RULES.iter().any(|r| r.strategy == strategy));
        }
    }
}
