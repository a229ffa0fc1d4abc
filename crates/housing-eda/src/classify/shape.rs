//! Distribution shape labels from skewness and kurtosis.

use serde::{Deserialize, Serialize};

/// Gaussian kurtosis under the non-excess convention the pipeline reports.
pub const GAUSSIAN_KURTOSIS: f64 = 3.0;

/// Absolute skewness beyond which a distribution counts as skewed.
pub const SKEW_THRESHOLD: f64 = 1.0;

/// Visual tone of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Neutral,
}

impl Tone {
    /// Hex colour used by badges and icons of this tone.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Success => "#22c55e",
            Self::Warning => "#f97316",
            Self::Danger => "#ef4444",
            Self::Neutral => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skewness {
    RightSkewed,
    LeftSkewed,
    Symmetric,
}

impl Skewness {
    /// Classify a skewness value. `±1` itself is symmetric.
    pub fn classify(skew: f64) -> Self {
        if skew > SKEW_THRESHOLD {
            Self::RightSkewed
        } else if skew < -SKEW_THRESHOLD {
            Self::LeftSkewed
        } else {
            Self::Symmetric
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::RightSkewed => "sesgada a la derecha",
            Self::LeftSkewed => "sesgada a la izquierda",
            Self::Symmetric => "simétrica",
        }
    }

    /// Icon name of the trend indicator shown next to the label.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::RightSkewed => "trending-up",
            Self::LeftSkewed => "trending-down",
            Self::Symmetric => "minus",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::RightSkewed | Self::LeftSkewed => Tone::Warning,
            Self::Symmetric => Tone::Success,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kurtosis {
    Leptokurtic,
    Platykurtic,
    Mesokurtic,
}

impl Kurtosis {
    /// Classify against a Gaussian reference of 3, not 0.
    pub fn classify(kurt: f64) -> Self {
        if kurt > GAUSSIAN_KURTOSIS {
            Self::Leptokurtic
        } else if kurt < GAUSSIAN_KURTOSIS {
            Self::Platykurtic
        } else {
            Self::Mesokurtic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Leptokurtic => "leptocúrtica",
            Self::Platykurtic => "platicúrtica",
            Self::Mesokurtic => "normal",
        }
    }
}

/// Convenience for callers that only need the label.
pub fn classify_skewness(skew: f64) -> &'static str {
    Skewness::classify(skew).label()
}

pub fn classify_kurtosis(kurt: f64) -> &'static str {
    Kurtosis::classify(kurt).label()
}
