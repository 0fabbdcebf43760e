//! Deterministic offline data: random-walk bars and a priced option chain,
//! seeded from a BLAKE3 hash of the ticker.
//!
//! Same ticker and `as_of` date always produce the same data.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, HistoryProvider, MarketDataProvider, Quote};
use crate::domain::{ContractQuote, OptionChain, OptionSide, PriceBar};
use crate::greeks::{years_to_expiry, BlackScholes};

const LISTED_EXPIRIES: usize = 4;
const STRIKES_PER_SIDE: i32 = 5;
const QUOTE_LOOKBACK_DAYS: u32 = 365;
/// Roughly three months of sessions for the average volume.
const AVERAGE_VOLUME_BARS: usize = 63;
const PRICING_RATE: f64 = 0.07;

fn seeded_rng(parts: &[&str]) -> StdRng {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update(&[0]);
    }
    StdRng::from_seed(*hasher.finalize().as_bytes())
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Offline provider for `--offline` runs and tests.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    as_of: NaiveDate,
}

impl SyntheticProvider {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    fn validate(ticker: &str) -> Result<(), DataError> {
        if ticker.trim().is_empty() {
            return Err(DataError::SymbolNotFound {
                symbol: ticker.to_string(),
            });
        }
        Ok(())
    }

    fn generate_bars(&self, ticker: &str, start: NaiveDate) -> Vec<PriceBar> {
        let mut rng = seeded_rng(&[ticker]);
        let mut bars = Vec::new();
        let mut price = 100.0_f64;
        let mut current = start;

        while current <= self.as_of {
            if is_weekend(current) {
                current += Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64);

            bars.push(PriceBar {
                date: current,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            current += Duration::days(1);
        }

        bars
    }

    /// Next Thursdays after `as_of`, nearest first.
    fn listed_expiries(&self) -> Vec<NaiveDate> {
        let mut expiries = Vec::with_capacity(LISTED_EXPIRIES);
        let mut day = self.as_of + Duration::days(1);
        while expiries.len() < LISTED_EXPIRIES {
            if day.weekday() == Weekday::Thu {
                expiries.push(day);
            }
            day += Duration::days(1);
        }
        expiries
    }

    /// At-the-money volatility for the ticker, between 15% and 75%.
    fn base_vol(ticker: &str) -> f64 {
        seeded_rng(&[ticker, "vol"]).gen_range(0.15..0.75)
    }

    fn strike_step(spot: f64) -> f64 {
        (spot * 0.025).round().max(1.0)
    }

    fn contract(
        rng: &mut StdRng,
        model: &BlackScholes,
        spot: f64,
        strike: f64,
        time: f64,
        base_vol: f64,
        side: OptionSide,
    ) -> ContractQuote {
        let moneyness = (strike / spot).ln();
        let vol = base_vol + 0.8 * moneyness * moneyness;
        ContractQuote {
            strike,
            last_price: model.price(spot, strike, time, vol, side),
            implied_vol: vol,
            open_interest: rng.gen_range(0..20_000u64),
            volume: rng.gen_range(0..5_000u64),
        }
    }
}

impl MarketDataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn quote(&self, ticker: &str) -> Result<Quote, DataError> {
        let bars = self.history(ticker, QUOTE_LOOKBACK_DAYS)?;
        let last = bars.last().ok_or_else(|| DataError::SymbolNotFound {
            symbol: ticker.to_string(),
        })?;
        let recent = &bars[bars.len().saturating_sub(AVERAGE_VOLUME_BARS)..];
        let average_volume =
            recent.iter().map(|b| b.volume as f64).sum::<f64>() / recent.len() as f64;
        Ok(Quote {
            price: last.close,
            average_volume,
            volume: last.volume as f64,
        })
    }

    fn expiries(&self, ticker: &str) -> Result<Vec<NaiveDate>, DataError> {
        Self::validate(ticker)?;
        Ok(self.listed_expiries())
    }

    fn chain(&self, ticker: &str, expiry: NaiveDate) -> Result<OptionChain, DataError> {
        if !self.expiries(ticker)?.contains(&expiry) {
            return Err(DataError::ExpiryNotFound {
                symbol: ticker.to_string(),
                expiry,
            });
        }

        let spot = self.quote(ticker)?.price;
        let step = Self::strike_step(spot);
        let center = (spot / step).round() * step;
        let time = years_to_expiry(self.as_of, expiry);
        let base_vol = Self::base_vol(ticker);
        let model = BlackScholes::with_rate(PRICING_RATE);
        let mut rng = seeded_rng(&[ticker, &expiry.to_string()]);

        let strikes: Vec<f64> = (-STRIKES_PER_SIDE..=STRIKES_PER_SIDE)
            .map(|i| center + f64::from(i) * step)
            .filter(|k| *k > 0.0)
            .collect();

        let calls = strikes
            .iter()
            .map(|&k| Self::contract(&mut rng, &model, spot, k, time, base_vol, OptionSide::Call))
            .collect();
        let puts = strikes
            .iter()
            .map(|&k| Self::contract(&mut rng, &model, spot, k, time, base_vol, OptionSide::Put))
            .collect();

        Ok(OptionChain {
            expiry,
            calls,
            puts,
        })
    }
}

impl HistoryProvider for SyntheticProvider {
    fn history(&self, ticker: &str, lookback_days: u32) -> Result<Vec<PriceBar>, DataError> {
        Self::validate(ticker)?;
        let start = self.as_of - Duration::days(i64::from(lookback_days));
        Ok(self.generate_bars(ticker, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> SyntheticProvider {
        SyntheticProvider::new(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap())
    }

    #[test]
    fn history_is_deterministic_and_skips_weekends() {
        let p = provider();
        let a = p.history("TCS.NS", 60).unwrap();
        let b = p.history("TCS.NS", 60).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|bar| !is_weekend(bar.date)));
        assert!(a.iter().all(PriceBar::is_sane));
    }

    #[test]
    fn tickers_get_different_paths() {
        let p = provider();
        let a = p.history("TCS.NS", 30).unwrap();
        let b = p.history("INFY.NS", 30).unwrap();
        assert_ne!(a.last().unwrap().close, b.last().unwrap().close);
    }

    #[test]
    fn quote_matches_last_bar() {
        let p = provider();
        let bars = p.history("SBIN.NS", QUOTE_LOOKBACK_DAYS).unwrap();
        let quote = p.quote("SBIN.NS").unwrap();
        assert_eq!(quote.price, bars.last().unwrap().close);
        assert!(quote.average_volume > 0.0);
    }

    #[test]
    fn expiries_are_future_thursdays() {
        let p = provider();
        let dates = p.expiries("TCS.NS").unwrap();
        assert_eq!(dates.len(), LISTED_EXPIRIES);
        assert!(dates.iter().all(|d| d.weekday() == Weekday::Thu && *d > p.as_of()));
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn chain_is_centered_on_spot() {
        let p = provider();
        let expiry = p.expiries("TCS.NS").unwrap()[0];
        let chain = p.chain("TCS.NS", expiry).unwrap();
        let spot = p.quote("TCS.NS").unwrap().price;
        let atm = chain.at_the_money(OptionSide::Call, spot).unwrap();
        assert!((atm.strike - spot).abs() <= SyntheticProvider::strike_step(spot));
        assert_eq!(chain.calls.len(), chain.puts.len());
        assert!(chain.calls.windows(2).all(|w| w[0].strike < w[1].strike));
    }

    #[test]
    fn unknown_expiry_is_error() {
        let p = provider();
        let err = p.chain("TCS.NS", p.as_of()).unwrap_err();
        assert!(matches!(err, DataError::ExpiryNotFound { .. }));
    }

    #[test]
    fn empty_ticker_not_found() {
        assert!(provider().history(" ", 30).is_err());
    }
}
