//! Risk decision produced by the ensemble
//!
//! A `RiskDecision` is immutable once produced and is persisted alongside
//! the claim outcome for audit. The action is the contract with the
//! dispatcher: exactly one downstream action per decision.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Coarse risk banding derived from the blended score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Derives the band from a blended score in [0,1]
    ///
    /// Bands are fixed: low below 0.33, high from 0.66.
    pub fn from_score(score: Decimal) -> Self {
        if score < dec!(0.33) {
            RiskLevel::Low
        } else if score < dec!(0.66) {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

/// The single action the pipeline takes for a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimAction {
    /// Trigger payout without human review
    InstantApprove,
    /// Send a rejection notice
    Reject,
    /// Route to a human adjuster
    Review,
}

/// The outcome of a single ensemble evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskDecision {
    /// Blended risk score in [0,1]
    pub risk_score: Decimal,
    /// Band derived from the blended score
    pub risk_level: RiskLevel,
    /// True if the score vector looked like a statistical outlier
    pub anomaly: bool,
    /// Confidence in [0,1]; lower when fewer providers contributed
    pub confidence: Decimal,
    /// The action to dispatch
    pub action: ClaimAction,
    /// Human-readable reasons behind a non-approve outcome
    pub review_reasons: Vec<String>,
    /// Version of the ensemble configuration that produced this decision
    pub config_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn risk_level_bands() {
        assert_eq!(RiskLevel::from_score(dec!(0.0)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(dec!(0.32)), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(dec!(0.33)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(dec!(0.65)), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(dec!(0.66)), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(dec!(1.0)), RiskLevel::High);
    }

    #[test]
    fn actions_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&ClaimAction::InstantApprove).unwrap(),
            "\"instant_approve\""
        );
        assert_eq!(serde_json::to_string(&ClaimAction::Review).unwrap(), "\"review\"");
    }
}
