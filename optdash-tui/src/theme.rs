//! Parrot/neon theme tokens.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, titles, keys)
//! - **Positive**: Neon green (bullish)
//! - **Negative**: Hot pink (bearish, errors)
//! - **Warning**: Neon orange (alerts, high IV, disclaimer)
//! - **Neutral**: Cool purple (neutral bias, secondary info)
//! - **Muted**: Steel blue (hints, unavailable values)

use ratatui::style::{Color, Modifier, Style};

use optdash_core::analysis::{Bias, IvRegime, IvThresholds};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn secondary() -> Style {
    Style::default().fg(TEXT_SECONDARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn bias_color(bias: Bias) -> Color {
    match bias {
        Bias::Bullish => POSITIVE,
        Bias::Bearish => NEGATIVE,
        Bias::Neutral => NEUTRAL,
    }
}

pub fn bias_style(bias: Bias) -> Style {
    Style::default().fg(bias_color(bias))
}

/// Rich premium stands out; cheap premium reads as an opportunity.
pub fn iv_style(iv_pct: f64, thresholds: &IvThresholds) -> Style {
    match IvRegime::classify(iv_pct, thresholds) {
        IvRegime::High => warning(),
        IvRegime::Low => positive(),
        IvRegime::Moderate => secondary(),
    }
}

/// Positive deltas green, negative pink.
pub fn signed_style(value: f64) -> Style {
    if value >= 0.0 {
        positive()
    } else {
        negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bias_colors() {
        assert_eq!(bias_color(Bias::Bullish), POSITIVE);
        assert_eq!(bias_color(Bias::Bearish), NEGATIVE);
        assert_eq!(bias_color(Bias::Neutral), NEUTRAL);
    }

    #[test]
    fn iv_regime_colors() {
        let levels = IvThresholds::default();
        assert_eq!(iv_style(75.0, &levels), warning());
        assert_eq!(iv_style(20.0, &levels), positive());
        assert_eq!(iv_style(60.0, &levels), secondary());
    }

    #[test]
    fn signed_zero_is_positive() {
        assert_eq!(signed_style(0.0), positive());
        assert_eq!(signed_style(-0.1), negative());
    }
}
