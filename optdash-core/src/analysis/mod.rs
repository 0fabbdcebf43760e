//! Technical analysis: indicator snapshot, status classification, and the
//! suggestion decision table.

pub mod classifier;
pub mod snapshot;
pub mod suggestion;

pub use classifier::{BandStatus, Bias, MacdStatus, RsiStatus, RsiThresholds, TechnicalStatus};
pub use snapshot::{IndicatorSet, IndicatorSnapshot, MIN_HISTORY_BARS};
pub use suggestion::{suggest, suggest_with, IvRegime, IvThresholds, Rule, Strategy, Suggestion, RULES};

use serde::Serialize;

use crate::domain::PriceBar;
use crate::section::Section;

/// Indicator series plus the classified latest snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct TechnicalReport {
    pub snapshot: IndicatorSnapshot,
    pub status: TechnicalStatus,
    #[serde(skip)]
    pub indicators: IndicatorSet,
}

/// Compute indicators over `bars` and classify the final bar.
///
/// Void bars (any OHLC value missing) are dropped first, so a gap inside the
/// history does not stall the indicators. Short or empty histories yield
/// `Section::InsufficientData`.
pub fn analyze(bars: &[PriceBar], thresholds: &RsiThresholds) -> Section<TechnicalReport> {
    let required = IndicatorSet::required_bars();
    let clean: Vec<PriceBar> = bars.iter().filter(|b| !b.is_void()).cloned().collect();
    if clean.len() < MIN_HISTORY_BARS {
        return Section::InsufficientData {
            available: clean.len(),
            required,
        };
    }

    let indicators = IndicatorSet::standard(&clean);
    match indicators.latest_snapshot() {
        Some(snapshot) => Section::Ready(TechnicalReport {
            status: TechnicalStatus::classify(&snapshot, thresholds),
            snapshot,
            indicators,
        }),
        None => Section::InsufficientData {
            available: clean.len(),
            required,
        },
    }
}
