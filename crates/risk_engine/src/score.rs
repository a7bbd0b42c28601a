//! Score vector
//!
//! The orchestrator produces one tagged result per provider. An
//! unavailable provider contributes the neutral score so that the
//! ensemble step is total over the vector, but remains distinguishable
//! from a provider that genuinely scored 0.5.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score contributed by a provider that errored or timed out
pub const NEUTRAL_SCORE: Decimal = dec!(0.5);

/// Tagged result of a single provider call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderScore {
    /// The provider returned a probability in [0,1]
    Available { score: Decimal },
    /// The provider errored or timed out; the neutral score stands in
    Unavailable { reason: String },
}

impl ProviderScore {
    pub fn available(score: Decimal) -> Self {
        ProviderScore::Available { score }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        ProviderScore::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ProviderScore::Available { .. })
    }

    /// The score this entry contributes to the blend
    pub fn effective_score(&self) -> Decimal {
        match self {
            ProviderScore::Available { score } => *score,
            ProviderScore::Unavailable { .. } => NEUTRAL_SCORE,
        }
    }
}

/// Immutable mapping from provider name to its tagged score
///
/// Built once per claim evaluation by the orchestrator. Attribution is by
/// provider name; insertion order never matters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreVector {
    scores: BTreeMap<String, ProviderScore>,
}

impl ScoreVector {
    pub fn new(scores: BTreeMap<String, ProviderScore>) -> Self {
        Self { scores }
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Total number of providers consulted
    pub fn provider_count(&self) -> usize {
        self.scores.len()
    }

    /// Number of providers that actually returned a score
    pub fn available_count(&self) -> usize {
        self.scores.values().filter(|s| s.is_available()).count()
    }

    pub fn get(&self, provider: &str) -> Option<&ProviderScore> {
        self.scores.get(provider)
    }

    /// The genuine score of a provider, `None` if absent or unavailable
    pub fn available_score(&self, provider: &str) -> Option<Decimal> {
        match self.scores.get(provider) {
            Some(ProviderScore::Available { score }) => Some(*score),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderScore)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of providers that failed to contribute
    pub fn unavailable_providers(&self) -> Vec<&str> {
        self.scores
            .iter()
            .filter(|(_, s)| !s.is_available())
            .map(|(k, _)| k.as_str())
            .collect()
    }
}
