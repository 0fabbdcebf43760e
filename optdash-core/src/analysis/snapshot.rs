//! Indicator series for a bar history and the snapshot of its latest bar.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::PriceBar;
use crate::indicators::{Bollinger, Indicator, Macd, MacdLine, Rsi};

/// Minimum bars of history before any technical output is attempted.
pub const MIN_HISTORY_BARS: usize = 20;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STDDEV: f64 = 2.0;

/// Indicator values at the most recent bar where every series is defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub bollinger_upper: f64,
    pub bollinger_middle: f64,
    pub bollinger_lower: f64,
    pub rsi14: f64,
    pub macd_line: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
}

/// Full indicator series aligned with the input bars, for charting.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSet {
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub bollinger_upper: Vec<f64>,
    pub bollinger_middle: Vec<f64>,
    pub bollinger_lower: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd_line: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_histogram: Vec<f64>,
}

impl IndicatorSet {
    /// RSI(14), MACD(12,26,9), Bollinger(20,2).
    pub fn standard(bars: &[PriceBar]) -> Self {
        let macd = Macd::new(MacdLine::Histogram, MACD_FAST, MACD_SLOW, MACD_SIGNAL).series(bars);
        Self {
            dates: bars.iter().map(|b| b.date).collect(),
            closes: bars.iter().map(|b| b.close).collect(),
            bollinger_upper: Bollinger::upper(BOLLINGER_PERIOD, BOLLINGER_STDDEV).compute(bars),
            bollinger_middle: Bollinger::middle(BOLLINGER_PERIOD, BOLLINGER_STDDEV).compute(bars),
            bollinger_lower: Bollinger::lower(BOLLINGER_PERIOD, BOLLINGER_STDDEV).compute(bars),
            rsi: Rsi::new(RSI_PERIOD).compute(bars),
            macd_line: macd.line,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
        }
    }

    /// Bars needed before every standard series has a value.
    pub fn required_bars() -> usize {
        let lookbacks = [
            Rsi::new(RSI_PERIOD).lookback(),
            Macd::new(MacdLine::Histogram, MACD_FAST, MACD_SLOW, MACD_SIGNAL).lookback(),
            Bollinger::upper(BOLLINGER_PERIOD, BOLLINGER_STDDEV).lookback(),
        ];
        let warmup = lookbacks.into_iter().max().unwrap_or(0) + 1;
        warmup.max(MIN_HISTORY_BARS)
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    fn snapshot_at(&self, i: usize) -> Option<IndicatorSnapshot> {
        let snapshot = IndicatorSnapshot {
            date: *self.dates.get(i)?,
            close: self.closes[i],
            bollinger_upper: self.bollinger_upper[i],
            bollinger_middle: self.bollinger_middle[i],
            bollinger_lower: self.bollinger_lower[i],
            rsi14: self.rsi[i],
            macd_line: self.macd_line[i],
            macd_signal: self.macd_signal[i],
            macd_histogram: self.macd_histogram[i],
        };
        let complete = [
            snapshot.close,
            snapshot.bollinger_upper,
            snapshot.bollinger_lower,
            snapshot.rsi14,
            snapshot.macd_histogram,
        ]
        .iter()
        .all(|v| v.is_finite());
        complete.then_some(snapshot)
    }

    /// Snapshot of the final bar. `None` when any series is undefined there;
    /// an older bar is never substituted.
    pub fn latest_snapshot(&self) -> Option<IndicatorSnapshot> {
        self.snapshot_at(self.len().checked_sub(1)?)
    }
}
