//! Dashboard session: scanner and deep-dive orchestration over one provider.
//!
//! The session owns the TTL caches. Each deep-dive stage returns a
//! [`Section`] so a front-end renders whatever succeeded and a message for
//! whatever did not.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::{analyze, suggest_with, Suggestion, TechnicalReport};
use crate::cache::{Fingerprint, TtlCache};
use crate::config::DashboardConfig;
use crate::data::{DashboardProvider, DataError, GreeksProvider, ScanProgress};
use crate::domain::{bar::last_close, normalize_ticker, OptionChain, OptionQuote, OptionSide, PriceBar};
use crate::greeks::{enrich_chain, BlackScholesGreeks};
use crate::scanner::{run_scan, ScanRow};
use crate::section::Section;

/// Failures that abort the whole deep dive.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DeepDiveError {
    #[error("enter a ticker for the deep dive")]
    EmptyTicker,

    #[error("could not fetch a price for {ticker}; check the symbol (.NS) and your connection")]
    PriceUnavailable { ticker: String },
}

/// Calls and puts with Greeks for one expiry.
#[derive(Debug, Clone, Serialize)]
pub struct ChainView {
    pub expiry: NaiveDate,
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
}

impl ChainView {
    pub fn side(&self, side: OptionSide) -> &[OptionQuote] {
        match side {
            OptionSide::Call => &self.calls,
            OptionSide::Put => &self.puts,
        }
    }
}

/// Everything shown for the deep-dive ticker.
#[derive(Debug, Clone, Serialize)]
pub struct DeepDive {
    pub ticker: String,
    pub price: f64,
    pub technical: Section<TechnicalReport>,
    /// Listed expiries, nearest first. Empty when unavailable.
    pub expiries: Vec<NaiveDate>,
    /// ATM implied volatility of the nearest expiry, in percent.
    pub atm_iv: Section<f64>,
    pub suggestion: Section<Suggestion>,
    pub chain: Section<ChainView>,
}

pub struct Dashboard {
    provider: Box<dyn DashboardProvider>,
    config: DashboardConfig,
    scan_cache: TtlCache<Vec<ScanRow>>,
    chain_cache: TtlCache<OptionChain>,
    as_of: Option<NaiveDate>,
}

impl Dashboard {
    pub fn new(provider: Box<dyn DashboardProvider>, config: DashboardConfig) -> Self {
        let ttl = config.cache_ttl();
        Self {
            provider,
            config,
            scan_cache: TtlCache::new(ttl),
            chain_cache: TtlCache::new(ttl),
            as_of: None,
        }
    }

    /// Pin the valuation date used for time to expiry (defaults to today).
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn today(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Drop cached scan and chain results.
    pub fn invalidate(&mut self) {
        self.scan_cache.clear();
        self.chain_cache.clear();
    }

    /// Entries currently held across the scan and chain caches.
    pub fn cached_entries(&self) -> usize {
        self.scan_cache.len() + self.chain_cache.len()
    }

    /// One row per ticker, served from the cache while fresh.
    pub fn scan(&mut self, tickers: &[String], progress: &dyn ScanProgress) -> Vec<ScanRow> {
        let tickers: Vec<String> = tickers
            .iter()
            .map(|t| normalize_ticker(t))
            .filter(|t| !t.is_empty())
            .collect();
        let key = Fingerprint::for_tickers(&tickers);
        if let Some(rows) = self.scan_cache.get(&key) {
            debug!(%key, "scan served from cache");
            return rows;
        }

        info!(count = tickers.len(), provider = self.provider.name(), "running scan");
        let rows = run_scan(self.provider.as_ref(), &tickers, progress);
        self.scan_cache.insert(key, rows.clone());
        rows
    }

    fn fetch_history(&self, ticker: &str) -> Result<Vec<PriceBar>, DataError> {
        self.provider.history(ticker, self.config.deep_dive.history_days)
    }

    /// Last close, falling back to the live quote.
    fn resolve_price(&self, ticker: &str, bars: &[PriceBar]) -> Result<f64, DeepDiveError> {
        let from_history = last_close(bars).filter(|p| *p > 0.0);
        let price = match from_history {
            Some(p) => Some(p),
            None => match self.provider.quote(ticker) {
                Ok(q) if q.price > 0.0 => Some(q.price),
                Ok(_) => None,
                Err(e) => {
                    warn!(ticker, error = %e, "quote failed");
                    None
                }
            },
        };
        price.ok_or_else(|| DeepDiveError::PriceUnavailable {
            ticker: ticker.to_string(),
        })
    }

    fn cached_chain(&mut self, ticker: &str, expiry: NaiveDate) -> Result<OptionChain, DataError> {
        let key = Fingerprint::for_chain(ticker, expiry);
        if let Some(chain) = self.chain_cache.get(&key) {
            return Ok(chain);
        }
        let chain = self.provider.chain(ticker, expiry)?;
        self.chain_cache.insert(key, chain.clone());
        Ok(chain)
    }

    fn chain_view(&mut self, ticker: &str, expiry: NaiveDate, spot: f64) -> Section<ChainView> {
        match self.cached_chain(ticker, expiry) {
            Ok(chain) => {
                let rate = self.config.options.risk_free_rate;
                let today = self.today();
                Section::Ready(ChainView {
                    expiry,
                    calls: enrich_chain(&chain, OptionSide::Call, spot, rate, today),
                    puts: enrich_chain(&chain, OptionSide::Put, spot, rate, today),
                })
            }
            Err(e) => {
                warn!(ticker, %expiry, error = %e, "option chain failed");
                Section::Failed(format!("error fetching option chain Greeks: {e}"))
            }
        }
    }

    fn expiries_section(&self, ticker: &str) -> Section<Vec<NaiveDate>> {
        match self.provider.expiries(ticker) {
            Ok(dates) if dates.is_empty() => {
                Section::Unavailable(format!("no option chain data available for {ticker}"))
            }
            Ok(dates) => Section::Ready(dates),
            Err(e) => {
                warn!(ticker, error = %e, "expiry lookup failed");
                Section::Failed(format!("error fetching option expiries: {e}"))
            }
        }
    }

    /// ATM call IV in percent for the nearest expiry; 0 when it has no calls.
    fn atm_iv(&mut self, ticker: &str, nearest: NaiveDate, spot: f64) -> Section<f64> {
        match self.cached_chain(ticker, nearest) {
            Ok(chain) => Section::Ready(
                chain
                    .at_the_money(OptionSide::Call, spot)
                    .map(|c| c.implied_vol * 100.0)
                    .unwrap_or(0.0),
            ),
            Err(e) => Section::Failed(format!("error generating strategy: {e}")),
        }
    }

    /// Full analysis of one ticker. Aborts only when no price can be found.
    pub fn deep_dive(&mut self, raw_ticker: &str) -> Result<DeepDive, DeepDiveError> {
        let ticker = normalize_ticker(raw_ticker);
        if ticker.is_empty() {
            return Err(DeepDiveError::EmptyTicker);
        }
        info!(ticker = %ticker, "deep dive");

        let history = self.fetch_history(&ticker);
        let bars: &[PriceBar] = match &history {
            Ok(bars) => bars,
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "history fetch failed");
                &[]
            }
        };
        let price = self.resolve_price(&ticker, bars)?;

        let technical = match &history {
            Ok(bars) => analyze(bars, &self.config.thresholds.rsi),
            Err(e) => Section::Failed(format!("could not fetch history: {e}")),
        };

        let expiries = self.expiries_section(&ticker);
        let nearest = expiries.as_ref().and_then(|dates| nearest_expiry(&ticker, dates));
        let atm_iv = nearest.clone().and_then(|d| self.atm_iv(&ticker, d, price));

        let iv_levels = self.config.thresholds.iv;
        let suggestion = technical.as_ref().and_then(|report| {
            atm_iv.as_ref().map(|iv| {
                suggest_with(*iv, report.status.rsi, report.status.macd, &iv_levels)
            })
        });

        let chain = nearest.and_then(|d| self.chain_view(&ticker, d, price));

        Ok(DeepDive {
            expiries: expiries.ready().cloned().unwrap_or_default(),
            ticker,
            price,
            technical,
            atm_iv,
            suggestion,
            chain,
        })
    }

    /// Greeks table for `expiry`, or the nearest expiry when `None`.
    ///
    /// Priced off the live quote; a missing spot is a hard error like in
    /// [`Dashboard::deep_dive`].
    pub fn option_chain(
        &mut self,
        raw_ticker: &str,
        expiry: Option<NaiveDate>,
    ) -> Result<Section<ChainView>, DeepDiveError> {
        let ticker = normalize_ticker(raw_ticker);
        if ticker.is_empty() {
            return Err(DeepDiveError::EmptyTicker);
        }

        let expiry = match expiry {
            Some(date) => date,
            None => {
                let nearest = self
                    .expiries_section(&ticker)
                    .and_then(|dates| nearest_expiry(&ticker, &dates));
                match nearest.into_ready() {
                    Ok(date) => date,
                    Err(other) => return Ok(other),
                }
            }
        };

        match self.greeks_view(&ticker, expiry) {
            Ok(view) => Ok(Section::Ready(view)),
            Err(DataError::NoSpotPrice { .. }) => Err(DeepDiveError::PriceUnavailable { ticker }),
            Err(e) => {
                warn!(ticker, %expiry, error = %e, "option chain failed");
                Ok(Section::Failed(format!("error fetching option chain Greeks: {e}")))
            }
        }
    }

    /// Both sides through the `GreeksProvider`, spot from the live quote.
    fn greeks_view(&self, ticker: &str, expiry: NaiveDate) -> Result<ChainView, DataError> {
        let greeks = BlackScholesGreeks::new(self.provider.as_ref(), self.today());
        let rate = self.config.options.risk_free_rate;
        Ok(ChainView {
            expiry,
            calls: greeks.greeks(ticker, expiry, OptionSide::Call, rate)?,
            puts: greeks.greeks(ticker, expiry, OptionSide::Put, rate)?,
        })
    }

    /// Greeks table for another expiry of an existing deep dive.
    pub fn chain_for(&mut self, dive: &DeepDive, expiry: NaiveDate) -> Section<ChainView> {
        let ticker = dive.ticker.clone();
        self.chain_view(&ticker, expiry, dive.price)
    }
}

fn nearest_expiry(ticker: &str, dates: &[NaiveDate]) -> Section<NaiveDate> {
    match dates.first() {
        Some(&d) => Section::Ready(d),
        None => Section::Unavailable(format!("no option chain data available for {ticker}")),
    }
}
