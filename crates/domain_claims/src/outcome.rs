//! Persisted claim outcome
//!
//! The outcome record is the idempotency ledger entry: created exactly
//! once per distinct claim identifier, and returned verbatim on any
//! resubmission of the same identifier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, Money};

use crate::decision::{ClaimAction, RiskDecision};

/// Client-visible status of a processed claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    InstantApproved,
    UnderReview,
    Rejected,
    /// Flagged as a duplicate of a recent claim
    Flagged,
}

/// The action that was actually dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    PayoutInitiated,
    RoutedToAdjuster,
    RejectionNoticeSent,
    /// Duplicate claims are flagged without entering scoring
    FlaggedDuplicate,
}

/// Persisted record of a completed claim evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimOutcome {
    pub claim_id: ClaimId,
    pub status: OutcomeStatus,
    /// The decision, if the claim reached the ensemble
    pub decision: Option<RiskDecision>,
    pub action_taken: ActionTaken,
    /// Payout amount, present only for instant approvals
    pub payout_amount: Option<Money>,
    /// Wall-clock time spent in the pipeline
    pub processing_time_ms: u64,
    pub decided_at: DateTime<Utc>,
}

impl ClaimOutcome {
    /// Confidence to report to the client; zero when no decision was made
    pub fn confidence(&self) -> rust_decimal::Decimal {
        self.decision
            .as_ref()
            .map(|d| d.confidence)
            .unwrap_or_default()
    }
}

impl OutcomeStatus {
    /// The next-step message shown to the claimant
    pub fn next_steps(&self) -> &'static str {
        match self {
            OutcomeStatus::InstantApproved => {
                "Funds transferred to your account (2-3 business days)"
            }
            OutcomeStatus::UnderReview => {
                "A claims specialist will review your case within 24 hours"
            }
            OutcomeStatus::Rejected => {
                "Your claim could not be approved; see the rejection notice for details"
            }
            OutcomeStatus::Flagged => {
                "Claim flagged for manual review due to similarity to recent claim"
            }
        }
    }
}

impl From<ClaimAction> for OutcomeStatus {
    fn from(action: ClaimAction) -> Self {
        match action {
            ClaimAction::InstantApprove => OutcomeStatus::InstantApproved,
            ClaimAction::Reject => OutcomeStatus::Rejected,
            ClaimAction::Review => OutcomeStatus::UnderReview,
        }
    }
}

impl From<ClaimAction> for ActionTaken {
    fn from(action: ClaimAction) -> Self {
        match action {
            ClaimAction::InstantApprove => ActionTaken::PayoutInitiated,
            ClaimAction::Reject => ActionTaken::RejectionNoticeSent,
            ClaimAction::Review => ActionTaken::RoutedToAdjuster,
        }
    }
}
