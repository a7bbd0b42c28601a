//! Scoring orchestrator
//!
//! Fans a claim's feature set out to every registered provider
//! concurrently and waits for all calls to settle. A provider that errors
//! or exceeds the per-provider timeout contributes an unavailable entry
//! (neutral score) instead of aborting the evaluation; one provider's
//! timeout never cancels another. Attribution is keyed by provider name,
//! never by completion order, so a slow call can never leak into another
//! claim's vector.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use core_kernel::ClaimId;

use crate::features::FeatureSet;
use crate::provider::ProviderRegistry;
use crate::score::{ProviderScore, ScoreVector};

/// Default per-provider timeout
///
/// Chosen so the scoring stage stays inside the pipeline's end-to-end
/// latency budget even when every provider runs to the deadline.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_millis(150);

/// Concurrent fan-out over the provider registry
#[derive(Debug, Clone)]
pub struct ScoringOrchestrator {
    registry: Arc<ProviderRegistry>,
    provider_timeout: Duration,
}

impl ScoringOrchestrator {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    /// Overrides the per-provider timeout
    pub fn with_provider_timeout(mut self, provider_timeout: Duration) -> Self {
        self.provider_timeout = provider_timeout;
        self
    }

    pub fn provider_count(&self) -> usize {
        self.registry.len()
    }

    /// Scores the feature set against every registered provider
    ///
    /// Returns once every provider call has settled (success, error, or
    /// timeout). Never returns early on first failure.
    pub async fn evaluate(&self, claim_id: ClaimId, features: &FeatureSet) -> ScoreVector {
        let features = Arc::new(features.clone());
        let deadline = self.provider_timeout;

        let mut handles = Vec::with_capacity(self.registry.len());
        for provider in self.registry.iter() {
            let provider = Arc::clone(provider);
            let features = Arc::clone(&features);
            let name = provider.name().to_string();

            let handle = tokio::spawn(async move {
                match timeout(deadline, provider.score(&features)).await {
                    Ok(Ok(score)) => ProviderScore::available(score),
                    Ok(Err(err)) => ProviderScore::unavailable(err.to_string()),
                    Err(_) => ProviderScore::unavailable(format!(
                        "timed out after {}ms",
                        deadline.as_millis()
                    )),
                }
            });
            handles.push((name, handle));
        }

        let mut scores = BTreeMap::new();
        for (name, handle) in handles {
            // A panicking provider degrades like any other failure; the
            // entry must survive so downstream gates still see it
            let entry = handle
                .await
                .unwrap_or_else(|_| ProviderScore::unavailable("provider panicked"));
            if let ProviderScore::Unavailable { reason } = &entry {
                tracing::warn!(%claim_id, provider = %name, %reason, "provider unavailable");
            }
            scores.insert(name, entry);
        }

        let vector = ScoreVector::new(scores);
        tracing::debug!(
            %claim_id,
            providers = vector.provider_count(),
            available = vector.available_count(),
            "scoring settled"
        );
        vector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use core_kernel::PortError;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::provider::ScoringProvider;
    use crate::score::NEUTRAL_SCORE;

    struct Fixed {
        name: &'static str,
        score: Decimal,
    }

    #[async_trait]
    impl ScoringProvider for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn score(&self, _features: &FeatureSet) -> Result<Decimal, PortError> {
            Ok(self.score)
        }
    }

    struct Failing(&'static str);

    #[async_trait]
    impl ScoringProvider for Failing {
        fn name(&self) -> &str {
            self.0
        }

        async fn score(&self, _features: &FeatureSet) -> Result<Decimal, PortError> {
            Err(PortError::unavailable(self.0))
        }
    }

    struct Slow {
        name: &'static str,
        delay: Duration,
        score: Decimal,
    }

    #[async_trait]
    impl ScoringProvider for Slow {
        fn name(&self) -> &str {
            self.name
        }

        async fn score(&self, _features: &FeatureSet) -> Result<Decimal, PortError> {
            tokio::time::sleep(self.delay).await;
            Ok(self.score)
        }
    }

    fn features() -> FeatureSet {
        use chrono::Utc;
        use core_kernel::{ClaimId, ClaimantId};
        use domain_claims::{ClaimType, GeoPoint};

        FeatureSet {
            claim_id: ClaimId::new_v7(),
            claimant_id: ClaimantId::new_v7(),
            claim_type: ClaimType::Theft,
            amount: dec!(1000),
            report_delay_hours: 4,
            description_word_count: 6,
            photo_count: 1,
            has_video: false,
            location: GeoPoint::new(0.0, 0.0),
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn attribution_is_by_name_not_completion_order() {
        let mut registry = ProviderRegistry::new();
        // The fast provider finishes first but must not claim the slow one's slot
        registry.register(Arc::new(Slow {
            name: "slow",
            delay: Duration::from_millis(30),
            score: dec!(0.9),
        }));
        registry.register(Arc::new(Fixed { name: "fast", score: dec!(0.1) }));

        let orchestrator = ScoringOrchestrator::new(Arc::new(registry))
            .with_provider_timeout(Duration::from_millis(500));
        let vector = orchestrator.evaluate(core_kernel::ClaimId::new_v7(), &features()).await;

        assert_eq!(vector.available_score("fast"), Some(dec!(0.1)));
        assert_eq!(vector.available_score("slow"), Some(dec!(0.9)));
    }

    #[tokio::test]
    async fn failing_provider_contributes_neutral_unavailable() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(Fixed { name: "ok", score: dec!(0.3) }));
        registry.register(Arc::new(Failing("broken")));

        let orchestrator = ScoringOrchestrator::new(Arc::new(registry));
        let vector = orchestrator.evaluate(core_kernel::ClaimId::new_v7(), &features()).await;

        assert_eq!(vector.provider_count(), 2);
        assert_eq!(vector.available_count(), 1);
        assert_eq!(vector.get("broken").unwrap().effective_score(), NEUTRAL_SCORE);
    }

    struct Panicking(&'static str);

    #[async_trait]
    impl ScoringProvider for Panicking {
        fn name(&self) -> &str {
            self.0
        }

        async fn score(&self, _features: &FeatureSet) -> Result<Decimal, PortError> {
            panic!("provider crashed")
        }
    }

    #[tokio::test]
    async fn panicking_provider_stays_in_the_vector_as_unavailable() {
        let mut registry = ProviderRegistry::new();
        // A vanished gate provider would let a clean blend skip the gate
        registry.register(Arc::new(Panicking(crate::provider_names::BEHAVIORAL_BIOMETRICS)));
        registry.register(Arc::new(Fixed { name: "ok", score: dec!(0.05) }));

        let orchestrator = ScoringOrchestrator::new(Arc::new(registry));
        let vector = orchestrator.evaluate(core_kernel::ClaimId::new_v7(), &features()).await;

        assert_eq!(vector.provider_count(), 2);
        let entry = vector
            .get(crate::provider_names::BEHAVIORAL_BIOMETRICS)
            .unwrap();
        assert!(!entry.is_available());
        assert_eq!(entry.effective_score(), NEUTRAL_SCORE);
    }

    #[tokio::test]
    async fn timeout_abandons_only_the_slow_provider() {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(Slow {
            name: "glacial",
            delay: Duration::from_secs(10),
            score: dec!(0.9),
        }));
        registry.register(Arc::new(Fixed { name: "prompt", score: dec!(0.2) }));

        let orchestrator = ScoringOrchestrator::new(Arc::new(registry))
            .with_provider_timeout(Duration::from_millis(50));

        let start = std::time::Instant::now();
        let vector = orchestrator.evaluate(core_kernel::ClaimId::new_v7(), &features()).await;

        // Settles at the timeout, not at the slow provider's pace
        assert!(start.elapsed() < Duration::from_secs(2));
        assert_eq!(vector.available_score("prompt"), Some(dec!(0.2)));
        assert!(!vector.get("glacial").unwrap().is_available());
    }

    #[tokio::test]
    async fn empty_registry_yields_empty_vector() {
        let orchestrator = ScoringOrchestrator::new(Arc::new(ProviderRegistry::new()));
        let vector = orchestrator.evaluate(core_kernel::ClaimId::new_v7(), &features()).await;
        assert!(vector.is_empty());
    }
}
