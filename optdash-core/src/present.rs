//! Display formatting shared by the CLI and TUI.
//!
//! Nothing here feeds back into classification or the suggestion table.

use crate::analysis::{BandStatus, Bias, MacdStatus, RsiStatus, Strategy, Suggestion, TechnicalStatus};
use crate::section::Section;

pub const NOT_AVAILABLE: &str = "N/A";

pub const DISCLAIMER: &str = "Disclaimer: this is an automated suggestion based on simplified \
technical rules. This is not financial advice. Always do your own research.";

pub fn format_price(price: Option<f64>, currency: &str) -> String {
    match price {
        Some(p) => format!("{currency}{p:.2}"),
        None => NOT_AVAILABLE.into(),
    }
}

/// IV already in percent, one decimal.
pub fn format_iv_pct(iv: Option<f64>) -> String {
    match iv {
        Some(v) => format!("{v:.1}%"),
        None => NOT_AVAILABLE.into(),
    }
}

pub fn format_volume_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{r:.2}x"),
        None => NOT_AVAILABLE.into(),
    }
}

/// Chain-table IV: a fraction rendered as percent to two decimals.
pub fn format_chain_iv(implied_vol: f64) -> String {
    format!("{:.2}%", implied_vol * 100.0)
}

pub fn format_greek(value: f64) -> String {
    format!("{value:.3}")
}

pub fn bias_label(bias: Bias) -> &'static str {
    match bias {
        Bias::Bullish => "Bullish",
        Bias::Bearish => "Bearish",
        Bias::Neutral => "Neutral",
    }
}

pub fn band_label(status: BandStatus) -> String {
    let name = match status {
        BandStatus::AboveUpper => "At Upper Band",
        BandStatus::BelowLower => "At Lower Band",
        BandStatus::InChannel => "In Channel",
    };
    format!("{name} ({})", bias_label(status.bias()))
}

pub fn rsi_label(status: RsiStatus) -> String {
    match status {
        RsiStatus::Overbought => format!("Overbought ({})", bias_label(status.bias())),
        RsiStatus::Oversold => format!("Oversold ({})", bias_label(status.bias())),
        RsiStatus::Neutral => "Neutral".into(),
    }
}

pub fn macd_label(status: MacdStatus) -> String {
    let name = match status {
        MacdStatus::BullishCrossover => "Bullish Crossover",
        MacdStatus::BearishCrossover => "Bearish Crossover",
    };
    format!("{name} ({})", bias_label(status.bias()))
}

/// (title, value) pairs of the three-field technical summary.
pub fn status_summary(status: &TechnicalStatus) -> [(&'static str, String); 3] {
    [
        ("Price vs. Bands", band_label(status.band)),
        ("RSI (14)", rsi_label(status.rsi)),
        ("MACD Status", macd_label(status.macd)),
    ]
}

/// "Strategy: Short Strangle (Sell OTM CE & PE)"
pub fn headline(suggestion: &Suggestion) -> String {
    match suggestion.strategy.legs() {
        Some(legs) => format!("Strategy: {} ({legs})", suggestion.label()),
        None => format!("Strategy: {}", suggestion.label()),
    }
}

pub fn rationale(suggestion: &Suggestion) -> String {
    let iv = suggestion.implied_vol;
    match suggestion.strategy {
        Strategy::SellPut => format!(
            "IV is high ({iv:.1}%), so premium is rich. The stock is Oversold, suggesting a \
             bounce. Selling a PE collects this premium (Bullish)."
        ),
        Strategy::SellCall => format!(
            "IV is high ({iv:.1}%), so premium is rich. The stock is Overbought, suggesting a \
             pullback. Selling a CE collects this premium (Bearish)."
        ),
        Strategy::ShortStrangle => format!(
            "IV is very high ({iv:.1}%) and technicals are neutral. A volatility crush is \
             possible; this strategy profits if the stock stays in a range."
        ),
        Strategy::BuyCall => format!(
            "IV is low ({iv:.1}%), making options cheap. MACD shows Bullish momentum. A long CE \
             has high reward potential if the stock moves up."
        ),
        Strategy::BuyPut => format!(
            "IV is low ({iv:.1}%), making options cheap. MACD shows Bearish momentum. A long PE \
             has high reward potential if the stock moves down."
        ),
        Strategy::LongStraddle => format!(
            "IV is low ({iv:.1}%), making options cheap. Suited to betting on a large move in \
             either direction, such as an earnings or news surprise."
        ),
        Strategy::BullCallSpread => "Technicals are Bullish. A spread defines your risk and has \
             a good risk/reward profile in moderate IV."
            .into(),
        Strategy::BearPutSpread => "Technicals are Bearish. A spread defines your risk and has \
             a good risk/reward profile in moderate IV."
            .into(),
        Strategy::NoClearSignal => "Technicals are mixed and IV is moderate. It is often best \
             to wait for a clearer setup."
            .into(),
    }
}

/// User-facing text for a section that did not compute.
pub fn section_message<T>(section: &Section<T>) -> Option<String> {
    match section {
        Section::Ready(_) => None,
        Section::InsufficientData {
            available,
            required,
        } => Some(format!(
            "Insufficient price history: {available} bars available, at least {required} required."
        )),
        Section::Unavailable(reason) => Some(reason.clone()),
        Section::Failed(message) => Some(message.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::suggest;

    #[test]
    fn missing_values_render_na() {
        assert_eq!(format_price(None, "₹"), "N/A");
        assert_eq!(format_iv_pct(None), "N/A");
        assert_eq!(format_volume_ratio(None), "N/A");
    }

    #[test]
    fn numeric_formats() {
        assert_eq!(format_price(Some(2500.456), "₹"), "₹2500.46");
        assert_eq!(format_iv_pct(Some(23.44)), "23.4%");
        assert_eq!(format_volume_ratio(Some(1.5)), "1.50x");
        assert_eq!(format_chain_iv(0.23456), "23.46%");
        assert_eq!(format_greek(-0.04567), "-0.046");
    }

    #[test]
    fn status_labels_carry_bias() {
        assert_eq!(band_label(BandStatus::AboveUpper), "At Upper Band (Bearish)");
        assert_eq!(rsi_label(RsiStatus::Oversold), "Oversold (Bullish)");
        assert_eq!(rsi_label(RsiStatus::Neutral), "Neutral");
        assert_eq!(macd_label(MacdStatus::BearishCrossover), "Bearish Crossover (Bearish)");
    }

    #[test]
    fn rationale_interpolates_iv() {
        let s = suggest(72.345, RsiStatus::Neutral, MacdStatus::BullishCrossover);
        assert!(rationale(&s).contains("(72.3%)"));
        assert_eq!(headline(&s), "Strategy: Short Strangle (Sell OTM CE & PE)");
    }

    #[test]
    fn moderate_rationale_is_fixed_text() {
        let s = suggest(45.0, RsiStatus::Neutral, MacdStatus::BullishCrossover);
        assert!(!rationale(&s).contains('%'));
        assert_eq!(headline(&s), "Strategy: No Clear Signal");
    }

    #[test]
    fn insufficient_message_names_requirement() {
        let s: Section<()> = Section::InsufficientData {
            available: 5,
            required: 34,
        };
        assert!(section_message(&s).unwrap().contains("34"));
        assert!(section_message(&Section::Ready(())).is_none());
    }
}
