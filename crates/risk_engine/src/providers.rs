//! Reference provider implementations
//!
//! The production signal sources (biometrics, device fingerprinting,
//! graph analysis, video authenticity, ...) are remote services behind
//! the [`ScoringProvider`](crate::provider::ScoringProvider) trait. The
//! implementations here are deterministic heuristic stand-ins over the
//! feature set, wired in by [`default_registry`] so the service runs end
//! to end without external model dependencies. Swap any of them out by
//! registering a different implementation under the same name.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use core_kernel::PortError;
use domain_claims::MAX_CLAIM_AMOUNT;

use crate::features::FeatureSet;
use crate::provider::{provider_names, ProviderRegistry, ScoringProvider};

/// A provider backed by a pure scoring function
pub struct HeuristicProvider {
    name: &'static str,
    score_fn: fn(&FeatureSet) -> Decimal,
}

impl HeuristicProvider {
    pub fn new(name: &'static str, score_fn: fn(&FeatureSet) -> Decimal) -> Self {
        Self { name, score_fn }
    }
}

#[async_trait]
impl ScoringProvider for HeuristicProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn score(&self, features: &FeatureSet) -> Result<Decimal, PortError> {
        Ok(clamp_unit((self.score_fn)(features)))
    }
}

fn clamp_unit(score: Decimal) -> Decimal {
    score.clamp(dec!(0), dec!(1))
}

fn behavioral_biometrics(features: &FeatureSet) -> Decimal {
    // Submissions filed within minutes of the incident look scripted
    if features.report_delay_hours < 1 {
        dec!(0.15)
    } else {
        dec!(0.05)
    }
}

fn device_fingerprint(features: &FeatureSet) -> Decimal {
    let mut score = dec!(0.1);
    if features.photo_count == 0 && !features.has_video {
        score += dec!(0.1);
    }
    score
}

fn velocity_checks(features: &FeatureSet) -> Decimal {
    if features.report_delay_hours < 1 {
        dec!(0.3)
    } else {
        dec!(0.1)
    }
}

fn identity_graph(features: &FeatureSet) -> Decimal {
    // Amount-weighted prior; the real model walks a shared-identity graph
    dec!(0.05) + features.amount / MAX_CLAIM_AMOUNT * dec!(0.2)
}

fn claim_pattern(features: &FeatureSet) -> Decimal {
    features.amount / dec!(50_000) * dec!(0.6)
}

fn network_analysis(features: &FeatureSet) -> Decimal {
    dec!(0.05) + Decimal::from(features.report_delay_hours.min(720)) / dec!(720) * dec!(0.1)
}

fn video_analysis(features: &FeatureSet) -> Decimal {
    if features.has_video {
        dec!(0.15)
    } else {
        dec!(0.35)
    }
}

fn text_sentiment(features: &FeatureSet) -> Decimal {
    if features.description_word_count < 3 {
        dec!(0.4)
    } else {
        dec!(0.1)
    }
}

/// Builds a registry with the eight reference providers
pub fn default_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    let providers: [(&'static str, fn(&FeatureSet) -> Decimal); 8] = [
        (provider_names::BEHAVIORAL_BIOMETRICS, behavioral_biometrics),
        (provider_names::DEVICE_FINGERPRINT, device_fingerprint),
        (provider_names::VELOCITY_CHECKS, velocity_checks),
        (provider_names::IDENTITY_GRAPH, identity_graph),
        (provider_names::CLAIM_PATTERN, claim_pattern),
        (provider_names::NETWORK_ANALYSIS, network_analysis),
        (provider_names::VIDEO_ANALYSIS, video_analysis),
        (provider_names::TEXT_SENTIMENT, text_sentiment),
    ];
    for (name, score_fn) in providers {
        registry.register(Arc::new(HeuristicProvider::new(name, score_fn)));
    }
    registry
}
