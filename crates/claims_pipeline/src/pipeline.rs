//! Claim processing pipeline
//!
//! Sequences one claim through the stages: ledger lookup, policy
//! verification, duplicate check, scoring fan-out, ensemble decision,
//! outcome record, action dispatch. The outcome is recorded before the
//! action is dispatched; a dispatch failure never changes a recorded
//! decision.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use domain_claims::{
    calculate_payout, ActionTaken, Claim, ClaimError, ClaimOutcome, OutcomeStatus,
};
use risk_engine::{ClaimAction, EnsembleEngine, FeatureSet, ScoreVector, ScoringOrchestrator};

use crate::dedupe::DuplicateClaimDetector;
use crate::dispatch::ActionDispatcher;
use crate::error::PipelineError;
use crate::ledger::{LedgerWrite, OutcomeLedger};
use crate::policy_cache::CachedPolicyStore;
use crate::stage::{ClaimStage, StageTracker};

/// Tunables of the pipeline, overridable through configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub provider_timeout_ms: u64,
    pub policy_ttl_secs: u64,
    pub duplicate_threshold: f64,
    pub duplicate_retention_days: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 150,
            policy_ttl_secs: 300,
            duplicate_threshold: crate::dedupe::DUPLICATE_THRESHOLD,
            duplicate_retention_days: 30,
        }
    }
}

impl PipelineConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn policy_ttl(&self) -> Duration {
        Duration::from_secs(self.policy_ttl_secs)
    }

    pub fn duplicate_retention(&self) -> Duration {
        Duration::from_secs(self.duplicate_retention_days * 24 * 60 * 60)
    }
}

/// The claim processing pipeline
pub struct ClaimsPipeline {
    policies: CachedPolicyStore,
    detector: DuplicateClaimDetector,
    orchestrator: ScoringOrchestrator,
    engine: EnsembleEngine,
    dispatcher: ActionDispatcher,
    ledger: Arc<dyn OutcomeLedger>,
}

impl ClaimsPipeline {
    pub fn new(
        policies: CachedPolicyStore,
        detector: DuplicateClaimDetector,
        orchestrator: ScoringOrchestrator,
        engine: EnsembleEngine,
        dispatcher: ActionDispatcher,
        ledger: Arc<dyn OutcomeLedger>,
    ) -> Self {
        Self {
            policies,
            detector,
            orchestrator,
            engine,
            dispatcher,
            ledger,
        }
    }

    /// Processes one submitted claim to a definitive outcome
    ///
    /// Resubmitting a claim id returns the recorded outcome verbatim:
    /// no re-score, no re-dispatch. A claim the duplicate index cannot
    /// vouch for is routed to review without scoring.
    ///
    /// # Errors
    ///
    /// Client errors (unknown or inactive policy, uncovered claim type)
    /// are returned before any side effect. Ledger failures propagate as
    /// [`PipelineError::Port`].
    pub async fn process(&self, claim: Claim) -> Result<ClaimOutcome, PipelineError> {
        let started = Instant::now();
        let mut stage = StageTracker::start(claim.id);

        if let Some(existing) = self.ledger.get(claim.id).await? {
            tracing::info!(claim_id = %claim.id, "resubmission, returning recorded outcome");
            return Ok(existing);
        }

        let policy = self
            .policies
            .get(claim.policy_id)
            .await?
            .ok_or(PipelineError::PolicyNotFound(claim.policy_id))?;
        if !policy.is_active() {
            return Err(PipelineError::PolicyInactive(claim.policy_id));
        }
        policy
            .coverage_limit_for(claim.claim_type)
            .ok_or(ClaimError::NotCovered(claim.claim_type))?;
        stage.advance(ClaimStage::PolicyChecked);

        match self.detector.check_and_register(&claim).await {
            Ok(check) if check.is_duplicate => {
                stage.advance(ClaimStage::DuplicateChecked);
                let outcome = undecided_outcome(
                    claim.id,
                    OutcomeStatus::Flagged,
                    ActionTaken::FlaggedDuplicate,
                    started,
                );
                return self.finalize(&claim, outcome, None, &mut stage).await;
            }
            Ok(_) => stage.advance(ClaimStage::DuplicateChecked),
            Err(err) => {
                // Fail closed: a claim the index cannot vouch for goes
                // to a human.
                tracing::warn!(
                    claim_id = %claim.id,
                    error = %err,
                    "duplicate check unavailable, forcing review"
                );
                stage.advance(ClaimStage::DuplicateChecked);
                let outcome = undecided_outcome(
                    claim.id,
                    OutcomeStatus::UnderReview,
                    ActionTaken::RoutedToAdjuster,
                    started,
                );
                return self.finalize(&claim, outcome, None, &mut stage).await;
            }
        }

        let features = FeatureSet::from_claim(&claim);
        let scores = self.orchestrator.evaluate(claim.id, &features).await;
        stage.advance(ClaimStage::Scored);

        let decision = self.engine.decide(&scores);
        stage.advance(ClaimStage::Decided);

        let payout = match decision.action {
            ClaimAction::InstantApprove => Some(calculate_payout(&claim, &policy)?),
            _ => None,
        };

        let action = decision.action;
        let outcome = ClaimOutcome {
            claim_id: claim.id,
            status: action.into(),
            decision: Some(decision),
            action_taken: action.into(),
            payout_amount: payout,
            processing_time_ms: elapsed_ms(started),
            decided_at: Utc::now(),
        };
        self.finalize(&claim, outcome, Some(scores), &mut stage).await
    }

    /// Looks up the recorded outcome for a claim
    pub async fn outcome(&self, claim_id: ClaimId) -> Result<Option<ClaimOutcome>, PipelineError> {
        Ok(self.ledger.get(claim_id).await?)
    }

    /// Number of scoring providers the pipeline consults
    pub fn provider_count(&self) -> usize {
        self.orchestrator.provider_count()
    }

    /// Records the outcome, then dispatches the action
    ///
    /// Losing the ledger race means another evaluation of the same
    /// claim id already committed; its record is returned and nothing
    /// is dispatched here.
    async fn finalize(
        &self,
        claim: &Claim,
        outcome: ClaimOutcome,
        scores: Option<ScoreVector>,
        stage: &mut StageTracker,
    ) -> Result<ClaimOutcome, PipelineError> {
        match self.ledger.record_if_absent(outcome.clone()).await? {
            LedgerWrite::AlreadyRecorded(existing) => {
                tracing::info!(claim_id = %claim.id, "outcome already recorded by a concurrent evaluation");
                Ok(existing)
            }
            LedgerWrite::Recorded => {
                if let Err(err) = self
                    .dispatcher
                    .dispatch(claim, &outcome, scores.as_ref())
                    .await
                {
                    // The recorded decision stands; the action is
                    // retried out of band.
                    tracing::error!(claim_id = %claim.id, error = %err, "action dispatch failed");
                }
                stage.advance(ClaimStage::Dispatched);
                Ok(outcome)
            }
        }
    }
}

fn undecided_outcome(
    claim_id: ClaimId,
    status: OutcomeStatus,
    action_taken: ActionTaken,
    started: Instant,
) -> ClaimOutcome {
    ClaimOutcome {
        claim_id,
        status,
        decision: None,
        action_taken,
        payout_amount: None,
        processing_time_ms: elapsed_ms(started),
        decided_at: Utc::now(),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
