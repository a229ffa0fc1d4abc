//! Correlation strength tiers and heatmap fill colours.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `|r|` above this is strong.
pub const STRONG_CORRELATION: f64 = 0.7;
/// `|r|` at or above this (and not strong) is moderate.
pub const MODERATE_CORRELATION: f64 = 0.4;

/// Hue for positive coefficients.
pub const POSITIVE_RGB: (u8, u8, u8) = (59, 130, 246);
/// Hue for negative coefficients.
pub const NEGATIVE_RGB: (u8, u8, u8) = (239, 68, 68);
/// Fill for cells without a value.
pub const PLACEHOLDER_RGB: (u8, u8, u8) = (229, 231, 235);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    /// The cell has no value (`NaN`).
    Undefined,
}

impl CorrelationStrength {
    pub fn classify(r: f64) -> Self {
        if r.is_nan() {
            return Self::Undefined;
        }
        let magnitude = r.abs();
        if magnitude > STRONG_CORRELATION {
            Self::Strong
        } else if magnitude >= MODERATE_CORRELATION {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::Weak => "weak",
            Self::Undefined => "undefined",
        }
    }

    /// Strong cells render their value in bold.
    pub fn is_bold(&self) -> bool {
        matches!(self, Self::Strong)
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An RGBA fill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Rgba {
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {:.2})", self.r, self.g, self.b, self.alpha)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// Fill colour for a coefficient: hue by sign, alpha = `|r|` clamped to `[0, 1]`.
pub fn correlation_color(r: f64) -> Rgba {
    if r.is_nan() {
        let (red, green, blue) = PLACEHOLDER_RGB;
        return Rgba {
            r: red,
            g: green,
            b: blue,
            alpha: 1.0,
        };
    }
    let (red, green, blue) = if r >= 0.0 { POSITIVE_RGB } else { NEGATIVE_RGB };
    Rgba {
        r: red,
        g: green,
        b: blue,
        alpha: r.abs().clamp(0.0, 1.0),
    }
}

/// Tier name of a coefficient.
pub fn correlation_tier(r: f64) -> &'static str {
    CorrelationStrength::classify(r).as_str()
}
