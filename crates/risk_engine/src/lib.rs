//! Risk Engine
//!
//! This crate turns a validated claim into a [`RiskDecision`] in three steps:
//!
//! 1. [`features`] extracts a model-ready feature set from the claim.
//! 2. [`orchestrator`] fans the feature set out to every registered
//!    [`ScoringProvider`] concurrently, with a per-provider timeout and a
//!    fail-open policy, producing a [`ScoreVector`].
//! 3. [`ensemble`] blends the vector into a single score, flags outliers,
//!    and applies the configurable decision thresholds.
//!
//! Providers are capability implementations registered by name; the engine
//! never knows what a provider does internally.

pub mod features;
pub mod score;
pub mod provider;
pub mod providers;
pub mod orchestrator;
pub mod ensemble;
pub mod error;

pub use features::FeatureSet;
pub use score::{ProviderScore, ScoreVector, NEUTRAL_SCORE};
pub use provider::{ScoringProvider, ProviderRegistry, provider_names};
pub use providers::default_registry;
pub use orchestrator::ScoringOrchestrator;
pub use ensemble::{EnsembleConfig, EnsembleEngine};
pub use error::RiskEngineError;

pub use domain_claims::decision::{ClaimAction, RiskDecision, RiskLevel};
