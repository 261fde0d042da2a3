//! Confidence conversions
//!
//! The store keeps confidence as a fraction in [0.0, 1.0]; curators edit and
//! filter it as a whole percentage in [0, 100].

use serde::Serialize;

/// Fraction -> rounded percentage, clamped to [0, 100]
pub fn to_percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Percentage -> fraction; values above 100 are clamped
pub fn from_percent(percent: u8) -> f64 {
    f64::from(percent.min(100)) / 100.0
}

/// Display bucket for a confidence percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn for_percent(percent: u8) -> Self {
        if percent >= 80 {
            ConfidenceBand::High
        } else if percent >= 50 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
        }
    }
}
