//! Technical status classification of an indicator snapshot.
//!
//! All comparisons are strict: a close exactly on a band is in the channel,
//! an RSI of exactly 70 or 30 is neutral, and a MACD histogram of exactly 0 is
//! bearish (there is no neutral MACD state). Non-finite inputs fall through to
//! the default arm of each classification, so every function is total.

use serde::{Deserialize, Serialize};

use super::snapshot::IndicatorSnapshot;

/// Directional lean of a status or strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Price relative to the Bollinger Bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandStatus {
    AboveUpper,
    BelowLower,
    InChannel,
}

impl BandStatus {
    pub fn classify(close: f64, upper: f64, lower: f64) -> Self {
        if close > upper {
            Self::AboveUpper
        } else if close < lower {
            Self::BelowLower
        } else {
            Self::InChannel
        }
    }

    /// Band breaks are read as mean-reversion signals.
    pub fn bias(&self) -> Bias {
        match self {
            Self::AboveUpper => Bias::Bearish,
            Self::BelowLower => Bias::Bullish,
            Self::InChannel => Bias::Neutral,
        }
    }
}

/// RSI overbought/oversold levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiThresholds {
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiStatus {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiStatus {
    /// Classify against the standard 70/30 levels.
    pub fn classify(rsi: f64) -> Self {
        Self::classify_with(rsi, &RsiThresholds::default())
    }

    pub fn classify_with(rsi: f64, thresholds: &RsiThresholds) -> Self {
        if rsi > thresholds.overbought {
            Self::Overbought
        } else if rsi < thresholds.oversold {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }

    pub fn bias(&self) -> Bias {
        match self {
            Self::Overbought => Bias::Bearish,
            Self::Oversold => Bias::Bullish,
            Self::Neutral => Bias::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdStatus {
    BullishCrossover,
    BearishCrossover,
}

impl MacdStatus {
    pub fn classify(histogram: f64) -> Self {
        if histogram > 0.0 {
            Self::BullishCrossover
        } else {
            Self::BearishCrossover
        }
    }

    pub fn bias(&self) -> Bias {
        match self {
            Self::BullishCrossover => Bias::Bullish,
            Self::BearishCrossover => Bias::Bearish,
        }
    }
}

/// The three independent classifications of one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalStatus {
    pub band: BandStatus,
    pub rsi: RsiStatus,
    pub macd: MacdStatus,
}

impl TechnicalStatus {
    pub fn classify(snapshot: &IndicatorSnapshot, thresholds: &RsiThresholds) -> Self {
        Self {
            band: BandStatus::classify(
                snapshot.close,
                snapshot.bollinger_upper,
                snapshot.bollinger_lower,
            ),
            rsi: RsiStatus::classify_with(snapshot.rsi14, thresholds),
            macd: MacdStatus::classify(snapshot.macd_histogram),
        }
    }
}
