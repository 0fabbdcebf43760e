//! Market scanner: price, volume ratio and nearest-expiry ATM IV per ticker.
//!
//! A ticker that fails yields an all-`None` row carrying the error text;
//! the batch always runs to completion.

use serde::Serialize;
use tracing::{debug, warn};

use crate::data::{DataError, MarketDataProvider, ScanProgress};
use crate::domain::OptionSide;

/// One line of the scan table. Numeric fields are `None` when unavailable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanRow {
    pub ticker: String,
    pub price: Option<f64>,
    /// ATM implied volatility of the nearest expiry, in percent.
    pub atm_iv_pct: Option<f64>,
    /// Current volume over average volume.
    pub volume_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanRow {
    pub fn failed(ticker: &str, error: &DataError) -> Self {
        Self {
            ticker: ticker.to_string(),
            price: None,
            atm_iv_pct: None,
            volume_ratio: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// `None` unless the average volume is positive.
pub fn volume_ratio(volume: f64, average_volume: f64) -> Option<f64> {
    (average_volume > 0.0).then(|| volume / average_volume)
}

/// ATM implied volatility (percent) of the nearest expiry.
///
/// 0 when the spot is not positive (nothing is fetched then), the ticker
/// lists no expiries, or the chain has no calls.
pub fn nearest_atm_iv<P: MarketDataProvider + ?Sized>(
    provider: &P,
    ticker: &str,
    spot: f64,
) -> Result<f64, DataError> {
    if spot.is_nan() || spot <= 0.0 {
        return Ok(0.0);
    }
    let expiries = provider.expiries(ticker)?;
    let Some(&nearest) = expiries.first() else {
        return Ok(0.0);
    };
    let chain = provider.chain(ticker, nearest)?;
    Ok(chain
        .at_the_money(OptionSide::Call, spot)
        .map(|c| c.implied_vol * 100.0)
        .unwrap_or(0.0))
}

pub fn scan_ticker<P: MarketDataProvider + ?Sized>(
    provider: &P,
    ticker: &str,
) -> Result<ScanRow, DataError> {
    let quote = provider.quote(ticker)?;
    let atm_iv = nearest_atm_iv(provider, ticker, quote.price)?;
    Ok(ScanRow {
        ticker: ticker.to_string(),
        price: Some(quote.price),
        atm_iv_pct: Some(atm_iv),
        volume_ratio: volume_ratio(quote.volume, quote.average_volume),
        error: None,
    })
}

/// Scan every ticker in order. Output has one row per input ticker.
pub fn run_scan<P: MarketDataProvider + ?Sized>(
    provider: &P,
    tickers: &[String],
    progress: &dyn ScanProgress,
) -> Vec<ScanRow> {
    let total = tickers.len();
    let mut rows = Vec::with_capacity(total);
    let mut failed = 0;

    for (i, ticker) in tickers.iter().enumerate() {
        progress.on_start(ticker, i, total);
        let row = match scan_ticker(provider, ticker) {
            Ok(row) => {
                debug!(ticker = %ticker, price = ?row.price, iv = ?row.atm_iv_pct, "scanned");
                row
            }
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "scan failed");
                failed += 1;
                ScanRow::failed(ticker, &e)
            }
        };
        progress.on_complete(&row, i, total);
        rows.push(row);
    }

    progress.on_batch_complete(total - failed, failed, total);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Quote;
    use crate::domain::OptionChain;
    use chrono::NaiveDate;

    /// Serves a zero-price quote; any options lookup is an error.
    struct NoOptions;

    impl MarketDataProvider for NoOptions {
        fn name(&self) -> &str {
            "no-options"
        }

        fn quote(&self, _ticker: &str) -> Result<Quote, DataError> {
            Ok(Quote {
                price: 0.0,
                average_volume: 1_000.0,
                volume: 1_500.0,
            })
        }

        fn expiries(&self, _ticker: &str) -> Result<Vec<NaiveDate>, DataError> {
            Err(DataError::NetworkUnreachable("offline".into()))
        }

        fn chain(&self, _ticker: &str, _expiry: NaiveDate) -> Result<OptionChain, DataError> {
            Err(DataError::NetworkUnreachable("offline".into()))
        }
    }

    #[test]
    fn non_positive_spot_skips_option_fetch() {
        assert_eq!(nearest_atm_iv(&NoOptions, "TCS.NS", 0.0), Ok(0.0));
        assert_eq!(nearest_atm_iv(&NoOptions, "TCS.NS", f64::NAN), Ok(0.0));

        let row = scan_ticker(&NoOptions, "TCS.NS").unwrap();
        assert!(row.is_ok());
        assert_eq!(row.atm_iv_pct, Some(0.0));
        assert_eq!(row.volume_ratio, Some(1.5));
    }

    #[test]
    fn ratio_requires_positive_average() {
        assert_eq!(volume_ratio(300.0, 200.0), Some(1.5));
        assert_eq!(volume_ratio(300.0, 0.0), None);
        assert_eq!(volume_ratio(300.0, -1.0), None);
    }

    #[test]
    fn failed_row_is_all_none() {
        let row = ScanRow::failed("BAD.NS", &DataError::SymbolNotFound { symbol: "BAD.NS".into() });
        assert!(!row.is_ok());
        assert!(row.price.is_none() && row.atm_iv_pct.is_none() && row.volume_ratio.is_none());
    }
}
