//! Black-Scholes Greeks for option-chain rows.

use std::f64::consts::PI;

use chrono::NaiveDate;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::data::{DataError, GreeksProvider, MarketDataProvider};
use crate::domain::{ContractQuote, OptionChain, OptionQuote, OptionSide};

const DAYS_PER_YEAR: f64 = 365.0;

/// Black-Scholes calculator. Volatility is a fraction, time is in years.
#[derive(Debug, Clone, Copy)]
pub struct BlackScholes {
    pub rate: f64,
    pub dividend: f64,
}

impl BlackScholes {
    pub fn new(rate: f64, dividend: f64) -> Self {
        Self { rate, dividend }
    }

    /// Zero dividend yield.
    pub fn with_rate(rate: f64) -> Self {
        Self::new(rate, 0.0)
    }

    fn d1(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        let numerator =
            (spot / strike).ln() + (self.rate - self.dividend + 0.5 * vol * vol) * time;
        numerator / (vol * time.sqrt())
    }

    fn d2(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        self.d1(spot, strike, time, vol) - vol * time.sqrt()
    }

    fn norm_cdf(x: f64) -> f64 {
        Normal::standard().cdf(x)
    }

    fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    fn degenerate(time: f64, vol: f64) -> bool {
        time <= 0.0 || vol <= 0.0 || !vol.is_finite()
    }

    pub fn price(&self, spot: f64, strike: f64, time: f64, vol: f64, side: OptionSide) -> f64 {
        if Self::degenerate(time, vol) {
            return match side {
                OptionSide::Call => (spot - strike).max(0.0),
                OptionSide::Put => (strike - spot).max(0.0),
            };
        }

        let d1 = self.d1(spot, strike, time, vol);
        let d2 = self.d2(spot, strike, time, vol);
        let disc_q = (-self.dividend * time).exp();
        let disc_r = (-self.rate * time).exp();

        match side {
            OptionSide::Call => {
                spot * disc_q * Self::norm_cdf(d1) - strike * disc_r * Self::norm_cdf(d2)
            }
            OptionSide::Put => {
                strike * disc_r * Self::norm_cdf(-d2) - spot * disc_q * Self::norm_cdf(-d1)
            }
        }
    }

    pub fn delta(&self, spot: f64, strike: f64, time: f64, vol: f64, side: OptionSide) -> f64 {
        if Self::degenerate(time, vol) {
            return match side {
                OptionSide::Call if spot > strike => 1.0,
                OptionSide::Put if spot < strike => -1.0,
                _ => 0.0,
            };
        }

        let d1 = self.d1(spot, strike, time, vol);
        let discount = (-self.dividend * time).exp();

        match side {
            OptionSide::Call => discount * Self::norm_cdf(d1),
            OptionSide::Put => discount * (Self::norm_cdf(d1) - 1.0),
        }
    }

    /// Same for calls and puts.
    pub fn gamma(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        if Self::degenerate(time, vol) {
            return 0.0;
        }

        let d1 = self.d1(spot, strike, time, vol);
        let discount = (-self.dividend * time).exp();

        discount * Self::norm_pdf(d1) / (spot * vol * time.sqrt())
    }

    /// Per 1 volatility point.
    pub fn vega(&self, spot: f64, strike: f64, time: f64, vol: f64) -> f64 {
        if Self::degenerate(time, vol) {
            return 0.0;
        }

        let d1 = self.d1(spot, strike, time, vol);
        let discount = (-self.dividend * time).exp();

        spot * discount * Self::norm_pdf(d1) * time.sqrt() / 100.0
    }

    /// Per calendar day.
    pub fn theta(&self, spot: f64, strike: f64, time: f64, vol: f64, side: OptionSide) -> f64 {
        if Self::degenerate(time, vol) {
            return 0.0;
        }

        let d1 = self.d1(spot, strike, time, vol);
        let d2 = self.d2(spot, strike, time, vol);
        let disc_q = (-self.dividend * time).exp();
        let disc_r = (-self.rate * time).exp();

        let decay = -spot * disc_q * Self::norm_pdf(d1) * vol / (2.0 * time.sqrt());

        let annual = match side {
            OptionSide::Call => {
                decay + self.dividend * spot * disc_q * Self::norm_cdf(d1)
                    - self.rate * strike * disc_r * Self::norm_cdf(d2)
            }
            OptionSide::Put => {
                decay - self.dividend * spot * disc_q * Self::norm_cdf(-d1)
                    + self.rate * strike * disc_r * Self::norm_cdf(-d2)
            }
        };
        annual / DAYS_PER_YEAR
    }

    /// Greek-enriched row for one contract.
    pub fn quote(&self, contract: &ContractQuote, spot: f64, time: f64, side: OptionSide) -> OptionQuote {
        let vol = contract.implied_vol;
        let strike = contract.strike;
        OptionQuote {
            strike,
            last_price: contract.last_price,
            implied_vol: vol,
            delta: self.delta(spot, strike, time, vol, side),
            theta: self.theta(spot, strike, time, vol, side),
            gamma: self.gamma(spot, strike, time, vol),
            vega: self.vega(spot, strike, time, vol),
            open_interest: contract.open_interest,
            volume: contract.volume,
        }
    }
}

/// Year fraction from `as_of` to `expiry`; zero once expired.
pub fn years_to_expiry(as_of: NaiveDate, expiry: NaiveDate) -> f64 {
    let days = (expiry - as_of).num_days().max(0);
    days as f64 / DAYS_PER_YEAR
}

/// Enrich one side of a chain with Greeks at `spot`.
pub fn enrich_chain(
    chain: &OptionChain,
    side: OptionSide,
    spot: f64,
    risk_free_rate: f64,
    as_of: NaiveDate,
) -> Vec<OptionQuote> {
    let model = BlackScholes::with_rate(risk_free_rate);
    let time = years_to_expiry(as_of, chain.expiry);
    chain
        .side(side)
        .iter()
        .map(|c| model.quote(c, spot, time, side))
        .collect()
}

/// `GreeksProvider` over any market-data source: spot from the quote,
/// contracts from the chain.
pub struct BlackScholesGreeks<'a, P: MarketDataProvider + ?Sized> {
    provider: &'a P,
    as_of: NaiveDate,
}

impl<'a, P: MarketDataProvider + ?Sized> BlackScholesGreeks<'a, P> {
    pub fn new(provider: &'a P, as_of: NaiveDate) -> Self {
        Self { provider, as_of }
    }
}

impl<P: MarketDataProvider + ?Sized> GreeksProvider for BlackScholesGreeks<'_, P> {
    fn greeks(
        &self,
        ticker: &str,
        expiry: NaiveDate,
        side: OptionSide,
        risk_free_rate: f64,
    ) -> Result<Vec<OptionQuote>, DataError> {
        let spot = self.provider.quote(ticker)?.price;
        if spot.is_nan() || spot <= 0.0 {
            return Err(DataError::NoSpotPrice {
                symbol: ticker.to_string(),
            });
        }
        let chain = self.provider.chain(ticker, expiry)?;
        Ok(enrich_chain(&chain, side, spot, risk_free_rate, self.as_of))
    }
}
