//! Moving Average Convergence Divergence (MACD).
//!
//! - Line: EMA(close, fast) - EMA(close, slow), lookback slow - 1
//! - Signal: EMA(line, signal), seeded after the line warm-up,
//!   lookback slow + signal - 2
//! - Histogram: line - signal, same lookback as signal

use super::ema::{ema_after_warmup, ema_of_series};
use super::Indicator;
use crate::domain::PriceBar;

/// Which MACD output series to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdLine {
    Macd,
    Signal,
    Histogram,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    line: MacdLine,
    name: String,
}

/// All three MACD series for one bar history.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl Macd {
    pub fn new(line: MacdLine, fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1 && signal >= 1, "MACD periods must be >= 1");
        assert!(fast < slow, "MACD fast period must be shorter than slow period");
        let tag = match line {
            MacdLine::Macd => "line",
            MacdLine::Signal => "signal",
            MacdLine::Histogram => "hist",
        };
        Self {
            fast,
            slow,
            signal,
            line,
            name: format!("macd_{tag}_{fast}_{slow}_{signal}"),
        }
    }

    /// MACD(12, 26, 9) histogram.
    pub fn standard_histogram() -> Self {
        Self::new(MacdLine::Histogram, 12, 26, 9)
    }

    /// Compute line, signal and histogram in one pass over the closes.
    pub fn series(&self, bars: &[PriceBar]) -> MacdSeries {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema_of_series(&closes, self.fast);
        let slow = ema_of_series(&closes, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = ema_after_warmup(&line, self.signal);
        let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
        MacdSeries {
            line,
            signal,
            histogram,
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.line {
            MacdLine::Macd => self.slow - 1,
            MacdLine::Signal | MacdLine::Histogram => self.slow + self.signal - 2,
        }
    }

    fn compute(&self, bars: &[PriceBar]) -> Vec<f64> {
        let series = self.series(bars);
        match self.line {
            MacdLine::Macd => series.line,
            MacdLine::Signal => series.signal,
            MacdLine::Histogram => series.histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn trending(n: usize) -> Vec<PriceBar> {
        let closes: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        make_bars(&closes)
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let bars = make_bars(&(0..60).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect::<Vec<_>>());
        let s = Macd::standard_histogram().series(&bars);
        for i in 0..bars.len() {
            if s.histogram[i].is_nan() {
                continue;
            }
            assert_approx(s.histogram[i], s.line[i] - s.signal[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn warmup_matches_lookback() {
        let bars = trending(50);
        for line in [MacdLine::Macd, MacdLine::Signal, MacdLine::Histogram] {
            let macd = Macd::new(line, 12, 26, 9);
            let out = macd.compute(&bars);
            let first_valid = out.iter().position(|v| !v.is_nan()).unwrap();
            assert_eq!(first_valid, macd.lookback(), "{}", macd.name());
        }
    }

    #[test]
    fn constant_prices_have_zero_histogram() {
        let bars = make_bars(&[100.0; 40]);
        let hist = Macd::standard_histogram().compute(&bars);
        assert_approx(hist[39], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn uptrend_line_is_positive() {
        let bars = trending(40);
        let line = Macd::new(MacdLine::Macd, 12, 26, 9).compute(&bars);
        assert!(line[39] > 0.0);
    }

    #[test]
    fn short_series_is_all_nan() {
        let bars = trending(33);
        assert!(Macd::standard_histogram().compute(&bars).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn standard_lookback() {
        assert_eq!(Macd::standard_histogram().lookback(), 33);
    }
}
