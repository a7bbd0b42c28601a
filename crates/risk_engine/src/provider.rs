//! Scoring provider capability interface
//!
//! Each risk model is an opaque provider behind this trait. New signal
//! sources are added by registering an implementation under a unique
//! name, never by extending the engine.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use core_kernel::PortError;

use crate::features::FeatureSet;

/// Well-known provider names used by the default decision configuration
///
/// The ensemble config refers to providers by these names for secondary
/// approval gates and hard-signal overrides; the engine itself treats
/// every name equally.
pub mod provider_names {
    pub const BEHAVIORAL_BIOMETRICS: &str = "behavioral_biometrics";
    pub const DEVICE_FINGERPRINT: &str = "device_fingerprint";
    pub const VELOCITY_CHECKS: &str = "velocity_checks";
    pub const IDENTITY_GRAPH: &str = "identity_graph";
    pub const CLAIM_PATTERN: &str = "claim_pattern";
    pub const NETWORK_ANALYSIS: &str = "network_analysis";
    pub const VIDEO_ANALYSIS: &str = "video_analysis";
    pub const TEXT_SENTIMENT: &str = "text_sentiment";
}

/// A single risk signal source
///
/// Implementations must return a probability in [0,1] or an error; a
/// failure must be an `Err`, never a sentinel score. The orchestrator
/// enforces the call timeout, so implementations need not.
#[async_trait]
pub trait ScoringProvider: Send + Sync + 'static {
    /// Unique registry name of this provider
    fn name(&self) -> &str;

    /// Scores the feature set, returning fraud probability in [0,1]
    async fn score(&self, features: &FeatureSet) -> Result<Decimal, PortError>;
}

/// Registry of scoring providers consulted for every claim
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ScoringProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a provider; the last registration of a name wins
    pub fn register(&mut self, provider: Arc<dyn ScoringProvider>) {
        self.providers
            .retain(|existing| existing.name() != provider.name());
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ScoringProvider>> {
        self.providers.iter()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}
