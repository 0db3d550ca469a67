//! Risk assessment types.
//!
//! Maps the classifier's probability onto the three-level clinical tier.

use serde::{Deserialize, Serialize};

/// Probability above which a case is HIGH risk.
pub const HIGH_THRESHOLD: f64 = 0.75;

/// Probability above which a case is MODERATE risk.
pub const MODERATE_THRESHOLD: f64 = 0.40;

/// Risk tier for dialysis initiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    /// Conservative management
    Low,
    /// Close monitoring recommended
    Moderate,
    /// Dialysis initiation should be considered
    High,
}

impl RiskTier {
    /// Classify a probability using the fixed clinical thresholds.
    ///
    /// Total over [0, 1]; the boundaries themselves fall into the lower
    /// tier (0.40 is LOW, 0.75 is MODERATE).
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_THRESHOLD {
            Self::High
        } else if probability > MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Clinical guidance line shown with the tier.
    #[must_use]
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Low => "Conservative management",
            Self::Moderate => "Monitor closely",
            Self::High => "Consider dialysis initiation",
        }
    }

    /// Associated display color (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),      // Emerald (#10B981)
            Self::Moderate => (251, 191, 36), // Amber (#FBBF24)
            Self::High => (244, 63, 94),      // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of scoring one observation. Created fresh per submission and
/// never persisted in memory beyond the request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Dialysis-initiation probability (0.0 to 1.0)
    pub probability: f64,

    /// Derived clinical tier
    pub tier: RiskTier,
}

impl RiskAssessment {
    /// Create an assessment from a raw probability.
    #[must_use]
    pub fn new(probability: f64) -> Self {
        Self {
            probability,
            tier: RiskTier::from_probability(probability),
        }
    }

    /// Probability formatted for display, e.g. `83.0%`.
    #[must_use]
    pub fn display_percent(&self) -> String {
        format!("{:.1}%", self.probability * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_from_probability() {
        assert_eq!(RiskTier::from_probability(0.0), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.10), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.50), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.83), RiskTier::High);
        assert_eq!(RiskTier::from_probability(1.0), RiskTier::High);
    }

    #[test]
    fn test_tier_boundaries_fall_low() {
        // Boundary values belong to the lower tier.
        assert_eq!(RiskTier::from_probability(0.40), RiskTier::Low);
        assert_eq!(RiskTier::from_probability(0.75), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.40 + 1e-9), RiskTier::Moderate);
        assert_eq!(RiskTier::from_probability(0.75 + 1e-9), RiskTier::High);
    }

    #[test]
    fn test_display_percent() {
        assert_eq!(RiskAssessment::new(0.83).display_percent(), "83.0%");
        assert_eq!(RiskAssessment::new(0.405).display_percent(), "40.5%");
        assert_eq!(RiskAssessment::new(0.0).display_percent(), "0.0%");
    }

    #[test]
    fn test_assessment_derives_tier() {
        assert_eq!(RiskAssessment::new(0.83).tier, RiskTier::High);
        assert_eq!(RiskAssessment::new(0.50).tier, RiskTier::Moderate);
        assert_eq!(RiskAssessment::new(0.10).tier, RiskTier::Low);
    }
}
