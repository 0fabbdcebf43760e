//! optdash TUI: terminal front-end over the `optdash-core` dashboard.
//!
//! Panels:
//! 1. Scanner: watchlist price, ATM IV and volume ratio
//! 2. Technicals: price with Bollinger bands, RSI, MACD
//! 3. Suggestion: strategy headline and rationale
//! 4. Chain: Greek-enriched option chain
//! 5. Help: keyboard shortcuts

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use input::handle_key;
