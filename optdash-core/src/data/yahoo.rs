//! Yahoo Finance data provider.
//!
//! History comes from the v8 chart API; quote, expiries and chains from the
//! v7 options API. Handles retries with exponential backoff, response parsing,
//! and the circuit breaker.
//!
//! Yahoo has no official API and is subject to unannounced format changes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::circuit_breaker::CircuitBreaker;
use super::provider::{DataError, HistoryProvider, MarketDataProvider, Quote};
use crate::domain::{ContractQuote, OptionChain, PriceBar};

const BASE_URL: &str = "https://query2.finance.yahoo.com";

// ── Chart API (history) ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ApiResult<ChartData>,
}

#[derive(Debug, Deserialize)]
struct ApiResult<T> {
    result: Option<Vec<T>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

// ── Options API (quote, expiries, chain) ─────────────────────────────

#[derive(Debug, Deserialize)]
struct OptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: ApiResult<OptionsData>,
}

#[derive(Debug, Deserialize)]
struct OptionsData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    quote: Option<YahooQuote>,
    #[serde(default)]
    options: Vec<OptionsBlock>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<f64>,
    #[serde(rename = "averageDailyVolume3Month")]
    average_daily_volume_3m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OptionsBlock {
    #[serde(rename = "expirationDate")]
    expiration_date: i64,
    #[serde(default)]
    calls: Vec<YahooContract>,
    #[serde(default)]
    puts: Vec<YahooContract>,
}

#[derive(Debug, Deserialize)]
struct YahooContract {
    strike: f64,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<f64>,
    volume: Option<f64>,
}

impl From<YahooContract> for ContractQuote {
    fn from(c: YahooContract) -> Self {
        Self {
            strike: c.strike,
            last_price: c.last_price.unwrap_or(0.0),
            implied_vol: c.implied_volatility.unwrap_or(0.0),
            open_interest: c.open_interest.unwrap_or(0.0).max(0.0) as u64,
            volume: c.volume.unwrap_or(0.0).max(0.0) as u64,
        }
    }
}

fn timestamp_to_date(ts: i64) -> Result<NaiveDate, DataError> {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))
}

fn date_to_timestamp(date: NaiveDate) -> i64 {
    date.and_time(chrono::NaiveTime::MIN).and_utc().timestamp()
}

/// Unwrap the first result of a Yahoo envelope, mapping API errors.
fn first_result<T>(symbol: &str, envelope: ApiResult<T>) -> Result<T, DataError> {
    let results = envelope.result.ok_or_else(|| match envelope.error {
        Some(err) if err.code == "Not Found" => DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        },
        Some(err) => DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => DataError::ResponseFormatChanged("empty result with no error".into()),
    })?;

    results.into_iter().next().ok_or_else(|| DataError::SymbolNotFound {
        symbol: symbol.to_string(),
    })
}

fn parse_chart(symbol: &str, resp: ChartResponse) -> Result<Vec<PriceBar>, DataError> {
    let data = first_result(symbol, resp.chart)?;

    // A valid symbol with no trades in range has no timestamps.
    let Some(timestamps) = data.timestamp else {
        return Ok(Vec::new());
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // holidays / non-trading days
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() {
            continue;
        }

        bars.push(PriceBar {
            date: timestamp_to_date(ts)?,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
        });
    }

    Ok(bars)
}

fn parse_quote(symbol: &str, data: &OptionsData) -> Result<Quote, DataError> {
    let quote = data.quote.as_ref().ok_or_else(|| DataError::SymbolNotFound {
        symbol: symbol.to_string(),
    })?;
    Ok(Quote {
        price: quote.regular_market_price.unwrap_or(0.0),
        average_volume: quote.average_daily_volume_3m.unwrap_or(1.0),
        volume: quote.regular_market_volume.unwrap_or(0.0),
    })
}

fn parse_expiries(data: &OptionsData) -> Result<Vec<NaiveDate>, DataError> {
    let mut dates = data
        .expiration_dates
        .iter()
        .map(|&ts| timestamp_to_date(ts))
        .collect::<Result<Vec<_>, _>>()?;
    dates.sort();
    dates.dedup();
    Ok(dates)
}

fn parse_chain(symbol: &str, expiry: NaiveDate, data: OptionsData) -> Result<OptionChain, DataError> {
    for block in data.options {
        if timestamp_to_date(block.expiration_date)? != expiry {
            continue;
        }
        let mut calls: Vec<ContractQuote> = block.calls.into_iter().map(Into::into).collect();
        let mut puts: Vec<ContractQuote> = block.puts.into_iter().map(Into::into).collect();
        calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        return Ok(OptionChain {
            expiry,
            calls,
            puts,
        });
    }
    Err(DataError::ExpiryNotFound {
        symbol: symbol.to_string(),
        expiry,
    })
}

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    circuit_breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(circuit_breaker: Arc<CircuitBreaker>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            circuit_breaker,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = date_to_timestamp(start);
        let end_ts = date_to_timestamp(end) + 86_399;
        format!(
            "{BASE_URL}/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d"
        )
    }

    fn options_url(symbol: &str, expiry: Option<NaiveDate>) -> String {
        match expiry {
            Some(date) => format!(
                "{BASE_URL}/v7/finance/options/{symbol}?date={}",
                date_to_timestamp(date)
            ),
            None => format!("{BASE_URL}/v7/finance/options/{symbol}"),
        }
    }

    /// GET a JSON document with retry and circuit breaker logic.
    fn get_json<T: DeserializeOwned>(&self, url: &str, symbol: &str) -> Result<T, DataError> {
        if !self.circuit_breaker.is_allowed() {
            return Err(DataError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                warn!(symbol, attempt, ?delay, "retrying Yahoo request");
                std::thread::sleep(delay);
            }

            if !self.circuit_breaker.is_allowed() {
                return Err(DataError::CircuitBreakerTripped);
            }

            debug!(symbol, url, "GET");
            let resp = match self.client.get(url).send() {
                Ok(resp) => resp,
                Err(e) if e.is_connect() || e.is_timeout() => {
                    last_error = Some(DataError::NetworkUnreachable(e.to_string()));
                    continue;
                }
                Err(e) => return Err(DataError::NetworkUnreachable(e.to_string())),
            };

            let status = resp.status();

            if status == reqwest::StatusCode::FORBIDDEN {
                self.circuit_breaker.trip();
                return Err(DataError::CircuitBreakerTripped);
            }

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                self.circuit_breaker.record_failure();
                let retry_after = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                last_error = Some(DataError::RateLimited {
                    retry_after_secs: retry_after,
                });
                continue;
            }

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(DataError::AuthenticationRequired(
                    "Yahoo Finance requires authentication".into(),
                ));
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                });
            }

            if !status.is_success() {
                self.circuit_breaker.record_failure();
                last_error = Some(DataError::Other(format!("HTTP {status} for {symbol}")));
                continue;
            }

            let text = resp
                .text()
                .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
            let body: T = serde_json::from_str(&text).map_err(|e| {
                DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
            })?;
            self.circuit_breaker.record_success();
            return Ok(body);
        }

        Err(last_error.unwrap_or_else(|| DataError::Other("max retries exceeded".into())))
    }

    fn options_data(&self, symbol: &str, expiry: Option<NaiveDate>) -> Result<OptionsData, DataError> {
        let resp: OptionsResponse = self.get_json(&Self::options_url(symbol, expiry), symbol)?;
        first_result(symbol, resp.option_chain)
    }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn quote(&self, ticker: &str) -> Result<Quote, DataError> {
        parse_quote(ticker, &self.options_data(ticker, None)?)
    }

    fn expiries(&self, ticker: &str) -> Result<Vec<NaiveDate>, DataError> {
        parse_expiries(&self.options_data(ticker, None)?)
    }

    fn chain(&self, ticker: &str, expiry: NaiveDate) -> Result<OptionChain, DataError> {
        parse_chain(ticker, expiry, self.options_data(ticker, Some(expiry))?)
    }
}

impl HistoryProvider for YahooProvider {
    fn history(&self, ticker: &str, lookback_days: u32) -> Result<Vec<PriceBar>, DataError> {
        let end = Utc::now().date_naive();
        let start = end - chrono::Duration::days(i64::from(lookback_days));
        let resp: ChartResponse = self.get_json(&Self::chart_url(ticker, start, end), ticker)?;
        parse_chart(ticker, resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704187800, 1704274200, 1704360600],
                "indicators": {
                    "quote": [{
                        "open": [100.0, null, 102.0],
                        "high": [101.0, null, 103.5],
                        "low": [99.0, null, 101.0],
                        "close": [100.5, null, 103.0],
                        "volume": [1000, null, 1500]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    const OPTIONS_JSON: &str = r#"{
        "optionChain": {
            "result": [{
                "underlyingSymbol": "RELIANCE.NS",
                "expirationDates": [1706140800, 1705536000],
                "quote": {
                    "regularMarketPrice": 2500.5,
                    "regularMarketVolume": 3000000,
                    "averageDailyVolume3Month": 2000000
                },
                "options": [{
                    "expirationDate": 1705536000,
                    "calls": [
                        {"strike": 2550.0, "lastPrice": 20.0, "impliedVolatility": 0.22, "openInterest": 10, "volume": 5},
                        {"strike": 2500.0, "lastPrice": 45.0, "impliedVolatility": 0.25}
                    ],
                    "puts": [
                        {"strike": 2450.0, "lastPrice": 18.0, "impliedVolatility": 0.27, "openInterest": 7, "volume": 2}
                    ]
                }]
            }],
            "error": null
        }
    }"#;

    fn options_data() -> OptionsData {
        let resp: OptionsResponse = serde_json::from_str(OPTIONS_JSON).unwrap();
        first_result("RELIANCE.NS", resp.option_chain).unwrap()
    }

    #[test]
    fn chart_skips_empty_days() {
        let resp: ChartResponse = serde_json::from_str(CHART_JSON).unwrap();
        let bars = parse_chart("RELIANCE.NS", resp).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].close, 103.0);
        assert!(bars[0].date < bars[1].date);
    }

    #[test]
    fn chart_not_found_maps_to_symbol_error() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parse_chart("NOPE.NS", resp).unwrap_err(),
            DataError::SymbolNotFound {
                symbol: "NOPE.NS".into()
            }
        );
    }

    #[test]
    fn chart_without_timestamps_is_empty() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[]}}],"error":null}}"#;
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(parse_chart("NEW.NS", resp).unwrap().is_empty());
    }

    #[test]
    fn quote_fields() {
        let quote = parse_quote("RELIANCE.NS", &options_data()).unwrap();
        assert_eq!(quote.price, 2500.5);
        assert_eq!(quote.average_volume, 2_000_000.0);
        assert_eq!(quote.volume, 3_000_000.0);
    }

    #[test]
    fn expiries_sorted_nearest_first() {
        let dates = parse_expiries(&options_data()).unwrap();
        assert_eq!(dates.len(), 2);
        assert!(dates[0] < dates[1]);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 18).unwrap());
    }

    #[test]
    fn chain_sorted_with_defaults() {
        let expiry = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        let chain = parse_chain("RELIANCE.NS", expiry, options_data()).unwrap();
        assert_eq!(chain.calls[0].strike, 2500.0);
        assert_eq!(chain.calls[0].open_interest, 0);
        assert_eq!(chain.puts.len(), 1);
    }

    #[test]
    fn chain_for_unknown_expiry() {
        let expiry = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert!(matches!(
            parse_chain("RELIANCE.NS", expiry, options_data()),
            Err(DataError::ExpiryNotFound { .. })
        ));
    }

    #[test]
    fn options_url_encodes_expiry() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        assert!(YahooProvider::options_url("TCS.NS", Some(date)).ends_with("?date=1705536000"));
    }
}
