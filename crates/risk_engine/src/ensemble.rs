//! Ensemble decision engine
//!
//! Blends a score vector into a single risk score, flags statistical
//! outliers, and applies the decision thresholds. All thresholds and
//! weights live in [`EnsembleConfig`] and are versioned; the version is
//! stamped onto every decision for audit.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use domain_claims::decision::{ClaimAction, RiskDecision, RiskLevel};

use crate::error::RiskEngineError;
use crate::provider::provider_names;
use crate::score::{ScoreVector, NEUTRAL_SCORE};

/// Tunable parameters of the ensemble
///
/// Defaults reproduce the production risk policy: approve below 0.15,
/// reject above 0.85, secondary approval gates on the behavioral and
/// device signals, and hard-signal overrides on the graph providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleConfig {
    /// Version stamp recorded on every decision
    pub version: String,
    /// Blend weight per provider; providers without an entry weigh 1
    pub weights: BTreeMap<String, Decimal>,
    /// Instant approval requires the blend strictly below this
    pub approve_below: Decimal,
    /// Rejection triggers when the blend is strictly above this
    pub reject_above: Decimal,
    /// Per-provider ceilings that must all hold for instant approval
    pub approval_gates: BTreeMap<String, Decimal>,
    /// Per-provider thresholds that force rejection on their own
    pub hard_signals: BTreeMap<String, Decimal>,
    /// Mean-absolute-deviation spread above which the vector is anomalous
    pub anomaly_spread: Decimal,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        // Graph and pattern signals carry more evidence than single-session
        // signals; weights are part of the versioned risk policy.
        weights.insert(provider_names::BEHAVIORAL_BIOMETRICS.to_string(), dec!(1.0));
        weights.insert(provider_names::DEVICE_FINGERPRINT.to_string(), dec!(1.0));
        weights.insert(provider_names::VELOCITY_CHECKS.to_string(), dec!(1.0));
        weights.insert(provider_names::IDENTITY_GRAPH.to_string(), dec!(1.5));
        weights.insert(provider_names::CLAIM_PATTERN.to_string(), dec!(1.5));
        weights.insert(provider_names::NETWORK_ANALYSIS.to_string(), dec!(1.5));
        weights.insert(provider_names::VIDEO_ANALYSIS.to_string(), dec!(1.0));
        weights.insert(provider_names::TEXT_SENTIMENT.to_string(), dec!(0.5));

        let mut approval_gates = BTreeMap::new();
        approval_gates.insert(provider_names::BEHAVIORAL_BIOMETRICS.to_string(), dec!(0.2));
        approval_gates.insert(provider_names::DEVICE_FINGERPRINT.to_string(), dec!(0.3));

        let mut hard_signals = BTreeMap::new();
        hard_signals.insert(provider_names::IDENTITY_GRAPH.to_string(), dec!(0.9));
        hard_signals.insert(provider_names::NETWORK_ANALYSIS.to_string(), dec!(0.95));

        Self {
            version: "ensemble-v1".to_string(),
            weights,
            approve_below: dec!(0.15),
            reject_above: dec!(0.85),
            approval_gates,
            hard_signals,
            anomaly_spread: dec!(0.25),
        }
    }
}

impl EnsembleConfig {
    /// Validates threshold and weight ranges
    pub fn validate(&self) -> Result<(), RiskEngineError> {
        let unit = dec!(0)..=dec!(1);
        for (name, value) in [
            ("approve_below", self.approve_below),
            ("reject_above", self.reject_above),
            ("anomaly_spread", self.anomaly_spread),
        ] {
            if !unit.contains(&value) {
                return Err(RiskEngineError::InvalidConfig(format!(
                    "{name} must be in [0,1], got {value}"
                )));
            }
        }
        for (provider, threshold) in self.approval_gates.iter().chain(self.hard_signals.iter()) {
            if !unit.contains(threshold) {
                return Err(RiskEngineError::InvalidConfig(format!(
                    "threshold for {provider} must be in [0,1], got {threshold}"
                )));
            }
        }
        if let Some((provider, weight)) =
            self.weights.iter().find(|(_, w)| w.is_sign_negative())
        {
            return Err(RiskEngineError::InvalidConfig(format!(
                "weight for {provider} must be non-negative, got {weight}"
            )));
        }
        Ok(())
    }

    fn weight_of(&self, provider: &str) -> Decimal {
        self.weights.get(provider).copied().unwrap_or(dec!(1))
    }
}

/// The decision engine
#[derive(Debug, Clone, Default)]
pub struct EnsembleEngine {
    config: EnsembleConfig,
}

impl EnsembleEngine {
    pub fn new(config: EnsembleConfig) -> Result<Self, RiskEngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    /// Produces the risk decision for a settled score vector
    ///
    /// Total over the tagged vector: unavailable entries blend at the
    /// neutral score and lower the confidence. An empty vector (no
    /// providers registered or index of a fully degraded run) yields a
    /// conservative review decision.
    pub fn decide(&self, vector: &ScoreVector) -> RiskDecision {
        if vector.is_empty() {
            return RiskDecision {
                risk_score: NEUTRAL_SCORE,
                risk_level: RiskLevel::from_score(NEUTRAL_SCORE),
                anomaly: false,
                confidence: dec!(0),
                action: ClaimAction::Review,
                review_reasons: vec!["no provider scores available".to_string()],
                config_version: self.config.version.clone(),
            };
        }

        let risk_score = self.blend(vector);
        let anomaly = self.is_anomalous(vector);

        let mut reasons = Vec::new();

        // Secondary gates: a gated provider that is present must score
        // under its ceiling; an unavailable one blends at neutral, which
        // fails the default gates and conservatively blocks approval.
        let mut gate_failures = Vec::new();
        for (provider, ceiling) in &self.config.approval_gates {
            if let Some(entry) = vector.get(provider) {
                let score = entry.effective_score();
                if score >= *ceiling {
                    gate_failures.push(format!(
                        "{provider} score {score} at or above instant-approval gate {ceiling}"
                    ));
                }
            }
        }

        let approve = risk_score < self.config.approve_below && !anomaly && gate_failures.is_empty();

        let mut reject_triggers = Vec::new();
        if risk_score > self.config.reject_above {
            reject_triggers.push(format!(
                "blended risk score {risk_score} above rejection threshold {}",
                self.config.reject_above
            ));
        }
        for (provider, threshold) in &self.config.hard_signals {
            if let Some(score) = vector.available_score(provider) {
                if score > *threshold {
                    reject_triggers.push(format!(
                        "{provider} score {score} above hard-signal threshold {threshold}"
                    ));
                }
            }
        }
        let reject = !reject_triggers.is_empty();

        let action = match (approve, reject) {
            (true, true) => {
                // A vector satisfying both rule sets is a policy conflict;
                // resolve conservatively and keep the evidence for tuning.
                tracing::warn!(
                    %risk_score,
                    config_version = %self.config.version,
                    "approve and reject criteria both satisfied; resolving to review"
                );
                reasons.push(
                    "conflicting approve and reject signals; resolved to review".to_string(),
                );
                reasons.extend(reject_triggers);
                ClaimAction::Review
            }
            (true, false) => ClaimAction::InstantApprove,
            (false, true) => {
                reasons.extend(reject_triggers);
                ClaimAction::Reject
            }
            (false, false) => {
                if anomaly {
                    reasons.push("score vector flagged as statistical outlier".to_string());
                }
                reasons.extend(gate_failures);
                if risk_score >= self.config.approve_below {
                    reasons.push(format!(
                        "blended risk score {risk_score} requires manual review"
                    ));
                }
                ClaimAction::Review
            }
        };

        let unavailable = vector.unavailable_providers();
        if action != ClaimAction::InstantApprove && !unavailable.is_empty() {
            reasons.push(format!("providers unavailable: {}", unavailable.join(", ")));
        }

        RiskDecision {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            anomaly,
            confidence: self.confidence(vector, risk_score),
            action,
            review_reasons: reasons,
            config_version: self.config.version.clone(),
        }
    }

    /// Weighted blend over the full tagged vector
    fn blend(&self, vector: &ScoreVector) -> Decimal {
        let mut weighted_sum = dec!(0);
        let mut weight_total = dec!(0);
        for (name, entry) in vector.iter() {
            let weight = self.config.weight_of(name);
            weighted_sum += entry.effective_score() * weight;
            weight_total += weight;
        }
        if weight_total.is_zero() {
            return NEUTRAL_SCORE;
        }
        (weighted_sum / weight_total).round_dp(6)
    }

    /// Deterministic outlier rule: mean absolute deviation of the
    /// available scores above the configured spread threshold
    fn is_anomalous(&self, vector: &ScoreVector) -> bool {
        let available: Vec<Decimal> = vector
            .iter()
            .filter_map(|(name, _)| vector.available_score(name))
            .collect();
        if available.len() < 2 {
            return false;
        }

        let n = Decimal::from(available.len());
        let mean: Decimal = available.iter().copied().sum::<Decimal>() / n;
        let mad: Decimal = available
            .iter()
            .map(|s| (*s - mean).abs())
            .sum::<Decimal>()
            / n;

        mad > self.config.anomaly_spread
    }

    /// Confidence in [0,1]
    ///
    /// Scales with the share of providers that actually contributed, then
    /// with how far the blend sits from the neutral point. Fewer
    /// contributing providers always means less confidence.
    fn confidence(&self, vector: &ScoreVector, risk_score: Decimal) -> Decimal {
        let availability =
            Decimal::from(vector.available_count()) / Decimal::from(vector.provider_count());
        let sharpness = ((risk_score - NEUTRAL_SCORE).abs() * dec!(2)).min(dec!(1));
        (availability * (dec!(0.5) + sharpness / dec!(2))).round_dp(6)
    }
}
