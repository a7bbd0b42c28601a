//! Pipeline stage machine
//!
//! Every claim moves through the stages in order, exactly once, and
//! never backwards. The tracker exists so stage transitions show up in
//! the logs with the claim they belong to.

use core_kernel::ClaimId;

/// Stages of a single claim evaluation, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClaimStage {
    Received,
    PolicyChecked,
    DuplicateChecked,
    Scored,
    Decided,
    Dispatched,
}

impl ClaimStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStage::Received => "received",
            ClaimStage::PolicyChecked => "policy_checked",
            ClaimStage::DuplicateChecked => "duplicate_checked",
            ClaimStage::Scored => "scored",
            ClaimStage::Decided => "decided",
            ClaimStage::Dispatched => "dispatched",
        }
    }
}

impl std::fmt::Display for ClaimStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current stage of one claim as it moves through the pipeline
#[derive(Debug)]
pub(crate) struct StageTracker {
    claim_id: ClaimId,
    stage: ClaimStage,
}

impl StageTracker {
    pub(crate) fn start(claim_id: ClaimId) -> Self {
        tracing::debug!(%claim_id, stage = %ClaimStage::Received, "stage entered");
        Self {
            claim_id,
            stage: ClaimStage::Received,
        }
    }

    /// Moves to a later stage; transitions are strictly forward
    pub(crate) fn advance(&mut self, to: ClaimStage) {
        debug_assert!(self.stage < to, "stage machine is one-way");
        tracing::debug!(claim_id = %self.claim_id, stage = %to, "stage entered");
        self.stage = to;
    }
}
