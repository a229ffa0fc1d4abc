//! Drift severity from KS-test p-values.

use super::Tone;
use crate::config::DriftThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftSeverity {
    Low,
    Medium,
    High,
}

impl DriftSeverity {
    /// `p < high` is high, `p < medium` is medium, everything else (NaN included) is low.
    pub fn classify(p_value: f64, thresholds: &DriftThresholds) -> Self {
        if p_value < thresholds.high {
            Self::High
        } else if p_value < thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// The collaborator's own severity when present, else the local classification.
    pub fn resolve(reported: Option<Self>, p_value: f64, thresholds: &DriftThresholds) -> Self {
        reported.unwrap_or_else(|| Self::classify(p_value, thresholds))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Low => Tone::Success,
            Self::Medium => Tone::Warning,
            Self::High => Tone::Danger,
        }
    }
}

impl fmt::Display for DriftSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_thresholds() {
        let thresholds = DriftThresholds::default();
        assert_eq!(DriftSeverity::classify(0.001, &thresholds), DriftSeverity::High);
        assert_eq!(DriftSeverity::classify(0.01, &thresholds), DriftSeverity::Medium);
        assert_eq!(DriftSeverity::classify(0.049, &thresholds), DriftSeverity::Medium);
        assert_eq!(DriftSeverity::classify(0.05, &thresholds), DriftSeverity::Low);
        assert_eq!(DriftSeverity::classify(f64::NAN, &thresholds), DriftSeverity::Low);
    }

    #[test]
    fn test_reported_severity_is_authoritative() {
        let thresholds = DriftThresholds::default();
        assert_eq!(
            DriftSeverity::resolve(Some(DriftSeverity::Low), 0.001, &thresholds),
            DriftSeverity::Low
        );
        assert_eq!(
            DriftSeverity::resolve(None, 0.001, &thresholds),
            DriftSeverity::High
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let severity: DriftSeverity = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(severity, DriftSeverity::Medium);
        assert_eq!(serde_json::to_string(&DriftSeverity::High).unwrap(), "\"high\"");
    }
}
