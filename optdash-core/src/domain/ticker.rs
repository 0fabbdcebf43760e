//! Ticker input normalization.
//!
//! Both the scan list and the deep-dive ticker are free text: trimmed and
//! upper-cased, nothing else is validated.

/// Trim and upper-case a single ticker.
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Split a comma-separated list into normalized tickers, dropping empty entries.
pub fn parse_ticker_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(normalize_ticker)
        .filter(|t| !t.is_empty())
        .collect()
}
