//! Domain types for the dashboard: price bars, option contracts, tickers.

pub mod bar;
pub mod option;
pub mod ticker;

pub use bar::PriceBar;
pub use option::{ContractQuote, OptionChain, OptionQuote, OptionSide};
pub use ticker::{normalize_ticker, parse_ticker_list};

/// Symbol type alias
pub type Ticker = String;
