//! Outcome ledger
//!
//! The ledger is the idempotency backbone of the pipeline: one record
//! per claim id, written exactly once. `record_if_absent` is
//! compare-and-set shaped so concurrent writers for the same claim id
//! resolve deterministically; the loser reads back the stored record and
//! must not dispatch.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use core_kernel::{ClaimId, PortError};
use domain_claims::ClaimOutcome;

/// Result of a first-writer-wins ledger write
#[derive(Debug, Clone)]
pub enum LedgerWrite {
    /// This call created the record; the caller owns dispatch
    Recorded,
    /// Another writer got there first; their record stands
    AlreadyRecorded(ClaimOutcome),
}

/// Persistent record of completed claim evaluations
#[async_trait]
pub trait OutcomeLedger: Send + Sync {
    /// Stores the outcome unless one already exists for the claim id
    async fn record_if_absent(&self, outcome: ClaimOutcome) -> Result<LedgerWrite, PortError>;

    /// Reads the stored outcome, if any
    async fn get(&self, claim_id: ClaimId) -> Result<Option<ClaimOutcome>, PortError>;
}

/// In-process ledger behind an async mutex
#[derive(Default)]
pub struct InMemoryOutcomeLedger {
    records: Mutex<HashMap<ClaimId, ClaimOutcome>>,
}

impl InMemoryOutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OutcomeLedger for InMemoryOutcomeLedger {
    async fn record_if_absent(&self, outcome: ClaimOutcome) -> Result<LedgerWrite, PortError> {
        let mut records = self.records.lock().await;
        match records.get(&outcome.claim_id) {
            Some(existing) => Ok(LedgerWrite::AlreadyRecorded(existing.clone())),
            None => {
                records.insert(outcome.claim_id, outcome);
                Ok(LedgerWrite::Recorded)
            }
        }
    }

    async fn get(&self, claim_id: ClaimId) -> Result<Option<ClaimOutcome>, PortError> {
        Ok(self.records.lock().await.get(&claim_id).cloned())
    }
}
