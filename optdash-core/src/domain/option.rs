//! Option contracts: raw chain rows and Greek-enriched quotes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Option side (call or put). CE/PE in the Indian market convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" | "CALL" | "CE" => Some(Self::Call),
            "P" | "PUT" | "PE" => Some(Self::Put),
            _ => None,
        }
    }

    /// Exchange suffix used in labels.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Call => "CE",
            Self::Put => "PE",
        }
    }
}

/// One contract row as delivered by the market-data provider.
///
/// `implied_vol` is a fraction (0.25 = 25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractQuote {
    pub strike: f64,
    pub last_price: f64,
    pub implied_vol: f64,
    pub open_interest: u64,
    pub volume: u64,
}

/// Calls and puts for a single expiry, strikes ascending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionChain {
    pub expiry: NaiveDate,
    pub calls: Vec<ContractQuote>,
    pub puts: Vec<ContractQuote>,
}

impl OptionChain {
    pub fn side(&self, side: OptionSide) -> &[ContractQuote] {
        match side {
            OptionSide::Call => &self.calls,
            OptionSide::Put => &self.puts,
        }
    }

    /// Contract whose strike is closest to `spot`.
    ///
    /// Ties go to the first contract in chain order (lowest strike).
    pub fn at_the_money(&self, side: OptionSide, spot: f64) -> Option<&ContractQuote> {
        let mut best: Option<(&ContractQuote, f64)> = None;
        for contract in self.side(side) {
            let distance = (contract.strike - spot).abs();
            if distance.is_nan() {
                continue;
            }
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((contract, distance)),
            }
        }
        best.map(|(c, _)| c)
    }
}

/// A contract enriched with Greeks, one row of the option-chain table.
///
/// `implied_vol` stays a fraction; display code converts it to percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    pub last_price: f64,
    pub implied_vol: f64,
    pub delta: f64,
    pub theta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub open_interest: u64,
    pub volume: u64,
}
