//! Suggestion engine: (ATM implied volatility, RSI status, MACD status) →
//! option strategy, via an ordered first-match decision table.
//!
//! Rule 6 (low IV, any momentum → Long Straddle) is kept in the table but is
//! shadowed: rules 4 and 5 cover both MACD states, so it never matches first.
//! It documents the volatility play the table would make if MACD ever gained
//! a neutral state.

use serde::{Deserialize, Serialize};

use super::classifier::{Bias, MacdStatus, RsiStatus};

/// Implied-volatility levels (percent) separating the three regimes.
///
/// IV strictly above `high` is high, strictly below `low` is low; both
/// boundary values are moderate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvThresholds {
    pub high: f64,
    pub low: f64,
}

impl Default for IvThresholds {
    fn default() -> Self {
        Self {
            high: 60.0,
            low: 35.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IvRegime {
    High,
    Moderate,
    Low,
}

impl IvRegime {
    /// Non-finite IV compares false on both sides and lands in `Moderate`.
    pub fn classify(implied_vol: f64, thresholds: &IvThresholds) -> Self {
        if implied_vol > thresholds.high {
            Self::High
        } else if implied_vol < thresholds.low {
            Self::Low
        } else {
            Self::Moderate
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    SellPut,
    SellCall,
    ShortStrangle,
    BuyCall,
    BuyPut,
    LongStraddle,
    BullCallSpread,
    BearPutSpread,
    NoClearSignal,
}

impl Strategy {
    pub const ALL: [Strategy; 9] = [
        Strategy::SellPut,
        Strategy::SellCall,
        Strategy::ShortStrangle,
        Strategy::BuyCall,
        Strategy::BuyPut,
        Strategy::LongStraddle,
        Strategy::BullCallSpread,
        Strategy::BearPutSpread,
        Strategy::NoClearSignal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SellPut => "Sell Put Option (PE)",
            Self::SellCall => "Sell Call Option (CE)",
            Self::ShortStrangle => "Short Strangle",
            Self::BuyCall => "Buy Call Option (CE)",
            Self::BuyPut => "Buy Put Option (PE)",
            Self::LongStraddle => "Long Straddle",
            Self::BullCallSpread => "Bull Call Spread",
            Self::BearPutSpread => "Bear Put Spread",
            Self::NoClearSignal => "No Clear Signal",
        }
    }

    /// Legs of the multi-leg strategies.
    pub fn legs(&self) -> Option<&'static str> {
        match self {
            Self::ShortStrangle => Some("Sell OTM CE & PE"),
            Self::LongStraddle => Some("Buy ATM CE & PE"),
            Self::BullCallSpread => Some("Buy CE, Sell higher CE"),
            Self::BearPutSpread => Some("Buy PE, Sell lower PE"),
            _ => None,
        }
    }

    pub fn bias(&self) -> Bias {
        match self {
            Self::SellPut | Self::BuyCall | Self::BullCallSpread => Bias::Bullish,
            Self::SellCall | Self::BuyPut | Self::BearPutSpread => Bias::Bearish,
            Self::ShortStrangle | Self::LongStraddle | Self::NoClearSignal => Bias::Neutral,
        }
    }
}

/// One row of the decision table. `None` conditions match anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub priority: u8,
    pub regime: Option<IvRegime>,
    pub rsi: Option<RsiStatus>,
    pub macd: Option<MacdStatus>,
    pub strategy: Strategy,
}

impl Rule {
    const fn new(
        priority: u8,
        regime: Option<IvRegime>,
        rsi: Option<RsiStatus>,
        macd: Option<MacdStatus>,
        strategy: Strategy,
    ) -> Self {
        Self {
            priority,
            regime,
            rsi,
            macd,
            strategy,
        }
    }

    pub fn matches(&self, regime: IvRegime, rsi: RsiStatus, macd: MacdStatus) -> bool {
        self.regime.map_or(true, |r| r == regime)
            && self.rsi.map_or(true, |r| r == rsi)
            && self.macd.map_or(true, |m| m == macd)
    }
}

use IvRegime::{High, Low, Moderate};
use MacdStatus::{BearishCrossover, BullishCrossover};
use RsiStatus::{Neutral, Overbought, Oversold};

/// The decision table, evaluated top to bottom; first match wins.
pub const RULES: [Rule; 9] = [
    Rule::new(1, Some(High), Some(Oversold), None, Strategy::SellPut),
    Rule::new(2, Some(High), Some(Overbought), None, Strategy::SellCall),
    Rule::new(3, Some(High), Some(Neutral), None, Strategy::ShortStrangle),
    Rule::new(4, Some(Low), None, Some(BullishCrossover), Strategy::BuyCall),
    Rule::new(5, Some(Low), None, Some(BearishCrossover), Strategy::BuyPut),
    Rule::new(6, Some(Low), None, None, Strategy::LongStraddle),
    Rule::new(7, Some(Moderate), Some(Oversold), Some(BullishCrossover), Strategy::BullCallSpread),
    Rule::new(8, Some(Moderate), Some(Overbought), Some(BearishCrossover), Strategy::BearPutSpread),
    Rule::new(9, None, None, None, Strategy::NoClearSignal),
];

/// First rule of `RULES` matching the inputs.
pub fn first_match(regime: IvRegime, rsi: RsiStatus, macd: MacdStatus) -> &'static Rule {
    RULES
        .iter()
        .find(|rule| rule.matches(regime, rsi, macd))
        .unwrap_or(&RULES[RULES.len() - 1])
}

/// Output of the engine. Labels and rationale text are rendered from this by
/// the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Suggestion {
    pub strategy: Strategy,
    /// ATM implied volatility in percent.
    pub implied_vol: f64,
    pub regime: IvRegime,
    pub rsi: RsiStatus,
    pub macd: MacdStatus,
    /// Priority of the rule that matched.
    pub rule: u8,
}

impl Suggestion {
    pub fn label(&self) -> &'static str {
        self.strategy.label()
    }

    pub fn bias(&self) -> Bias {
        self.strategy.bias()
    }
}

/// Evaluate the decision table with the standard 60/35 IV levels.
pub fn suggest(implied_vol: f64, rsi: RsiStatus, macd: MacdStatus) -> Suggestion {
    suggest_with(implied_vol, rsi, macd, &IvThresholds::default())
}

pub fn suggest_with(
    implied_vol: f64,
    rsi: RsiStatus,
    macd: MacdStatus,
    thresholds: &IvThresholds,
) -> Suggestion {
    let regime = IvRegime::classify(implied_vol, thresholds);
    let rule = first_match(regime, rsi, macd);
    Suggestion {
        strategy: rule.strategy,
        implied_vol,
        regime,
        rsi,
        macd,
        rule: rule.priority,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_RSI: [RsiStatus; 3] = [Overbought, Oversold, Neutral];
    const ALL_MACD: [MacdStatus; 2] = [BullishCrossover, BearishCrossover];

    #[test]
    fn scenario_a_high_iv_oversold() {
        let s = suggest(75.0, Oversold, BearishCrossover);
        assert_eq!(s.label(), "Sell Put Option (PE)");
        assert_eq!(s.rule, 1);
    }

    #[test]
    fn scenario_b_low_iv_bullish() {
        assert_eq!(suggest(20.0, Neutral, BullishCrossover).label(), "Buy Call Option (CE)");
    }

    #[test]
    fn scenario_c_moderate_bullish_oversold() {
        assert_eq!(suggest(45.0, Oversold, BullishCrossover).label(), "Bull Call Spread");
    }

    #[test]
    fn scenario_d_moderate_mixed() {
        assert_eq!(suggest(50.0, Neutral, BearishCrossover).label(), "No Clear Signal");
    }

    #[test]
    fn high_iv_ignores_macd() {
        for macd in ALL_MACD {
            assert_eq!(suggest(61.0, Oversold, macd).strategy, Strategy::SellPut);
            assert_eq!(suggest(61.0, Overbought, macd).strategy, Strategy::SellCall);
            assert_eq!(suggest(61.0, Neutral, macd).strategy, Strategy::ShortStrangle);
        }
    }

    #[test]
    fn low_iv_follows_macd_only() {
        for rsi in ALL_RSI {
            assert_eq!(suggest(34.9, rsi, BullishCrossover).strategy, Strategy::BuyCall);
            assert_eq!(suggest(0.0, rsi, BearishCrossover).strategy, Strategy::BuyPut);
        }
    }

    #[test]
    fn long_straddle_rule_is_shadowed() {
        for regime in [High, Moderate, Low] {
            for rsi in ALL_RSI {
                for macd in ALL_MACD {
                    let rule = first_match(regime, rsi, macd);
                    assert_ne!(rule.priority, 6);
                    assert_ne!(rule.strategy, Strategy::LongStraddle);
                }
            }
        }
        // the rule itself would match if evaluated in isolation
        assert!(RULES[5].matches(Low, Neutral, BullishCrossover));
    }

    #[test]
    fn boundaries_are_moderate() {
        for iv in [35.0, 60.0] {
            assert_eq!(IvRegime::classify(iv, &IvThresholds::default()), Moderate);
            assert_eq!(suggest(iv, Oversold, BullishCrossover).strategy, Strategy::BullCallSpread);
            assert_eq!(suggest(iv, Overbought, BearishCrossover).strategy, Strategy::BearPutSpread);
            assert_eq!(suggest(iv, Overbought, BullishCrossover).strategy, Strategy::NoClearSignal);
        }
    }

    #[test]
    fn nan_iv_is_moderate() {
        assert_eq!(suggest(f64::NAN, Oversold, BullishCrossover).strategy, Strategy::BullCallSpread);
    }

    #[test]
    fn rules_are_in_priority_order() {
        for (i, rule) in RULES.iter().enumerate() {
            assert_eq!(rule.priority as usize, i + 1);
        }
    }

    #[test]
    fn strategy_bias_matches_table() {
        assert_eq!(Strategy::SellPut.bias(), Bias::Bullish);
        assert_eq!(Strategy::BearPutSpread.bias(), Bias::Bearish);
        assert_eq!(Strategy::LongStraddle.bias(), Bias::Neutral);
    }

    #[test]
    fn custom_iv_thresholds() {
        let t = IvThresholds {
            high: 40.0,
            low: 20.0,
        };
        assert_eq!(suggest_with(45.0, Neutral, BullishCrossover, &t).strategy, Strategy::ShortStrangle);
        assert_eq!(suggest_with(30.0, Neutral, BullishCrossover, &t).strategy, Strategy::NoClearSignal);
    }
}
