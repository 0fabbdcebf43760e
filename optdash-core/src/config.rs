//! Dashboard configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! NSE watchlist, a 7% risk-free rate and a ten-minute cache.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{IvThresholds, RsiThresholds};
use crate::domain::normalize_ticker;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub tickers: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tickers: [
                "RELIANCE.NS",
                "TCS.NS",
                "INFY.NS",
                "HDFCBANK.NS",
                "ICICIBANK.NS",
                "SBIN.NS",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeepDiveConfig {
    pub ticker: String,
    /// Calendar days of daily history to fetch.
    pub history_days: u32,
}

impl Default for DeepDiveConfig {
    fn default() -> Self {
        Self {
            ticker: "RELIANCE.NS".into(),
            history_days: 365,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// Annualized, as a fraction.
    pub risk_free_rate: f64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.07,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 600 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: "₹".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdsConfig {
    pub rsi: RsiThresholds,
    pub iv: IvThresholds,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub scan: ScanConfig,
    pub deep_dive: DeepDiveConfig,
    pub options: OptionsConfig,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
    pub thresholds: ThresholdsConfig,
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.normalize_tickers();
        config.validate()?;
        Ok(config)
    }

    /// Trim and upper-case the watchlist and deep-dive ticker; blank
    /// watchlist entries are dropped.
    pub fn normalize_tickers(&mut self) {
        self.scan.tickers = self
            .scan
            .tickers
            .iter()
            .map(|t| normalize_ticker(t))
            .filter(|t| !t.is_empty())
            .collect();
        self.deep_dive.ticker = normalize_ticker(&self.deep_dive.ticker);
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rsi = &self.thresholds.rsi;
        if !rsi.oversold.is_finite() || !rsi.overbought.is_finite() {
            return Err(ConfigError::Invalid("rsi thresholds must be finite".into()));
        }
        if rsi.oversold >= rsi.overbought {
            return Err(ConfigError::Invalid(format!(
                "rsi oversold ({}) must be below overbought ({})",
                rsi.oversold, rsi.overbought
            )));
        }
        let iv = &self.thresholds.iv;
        if !iv.low.is_finite() || !iv.high.is_finite() {
            return Err(ConfigError::Invalid("iv thresholds must be finite".into()));
        }
        if iv.low > iv.high {
            return Err(ConfigError::Invalid(format!(
                "iv low ({}) must not exceed high ({})",
                iv.low, iv.high
            )));
        }
        if !self.options.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid("risk_free_rate must be finite".into()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.scan.tickers.len(), 6);
        assert_eq!(config.options.risk_free_rate, 0.07);
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn partial_override() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [scan]
            tickers = ["TCS.NS"]

            [thresholds.iv]
            high = 50.0
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.tickers, vec!["TCS.NS".to_string()]);
        assert_eq!(config.thresholds.iv.high, 50.0);
        assert_eq!(config.thresholds.iv.low, 35.0);
        assert_eq!(config.deep_dive.ticker, "RELIANCE.NS");
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = DashboardConfig::default();
        config.display.currency = "$".into();
        config.deep_dive.history_days = 180;
        let text = config.to_toml_string().unwrap();
        assert_eq!(DashboardConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn inverted_rsi_levels_rejected() {
        let err = DashboardConfig::from_toml_str("[thresholds.rsi]\noversold = 80.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn tickers_are_trimmed_and_upper_cased() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [scan]
            tickers = [" tcs.ns ", "", "infy.ns"]

            [deep_dive]
            ticker = " sbin.ns"
            "#,
        )
        .unwrap();
        assert_eq!(config.scan.tickers, vec!["TCS.NS", "INFY.NS"]);
        assert_eq!(config.deep_dive.ticker, "SBIN.NS");
    }

    #[test]
    fn nan_thresholds_rejected() {
        let mut config = DashboardConfig::default();
        config.thresholds.rsi.oversold = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = DashboardConfig::default();
        config.thresholds.iv.high = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = DashboardConfig::default();
        config.thresholds.iv.low = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            DashboardConfig::from_toml_str("[scan\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
