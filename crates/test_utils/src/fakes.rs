//! Fake Collaborators
//!
//! Hand-rolled fakes for the scoring providers and pipeline
//! collaborator traits. Recording fakes capture what was dispatched so
//! tests can assert on side effects; toggling fakes simulate outages.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use core_kernel::{ClaimId, ClaimantId, Money, PolicyId, PortError};
use domain_claims::{Claim, PolicySnapshot};
use risk_engine::{FeatureSet, ScoringProvider};

use claims_pipeline::dedupe::{ClaimFingerprint, DuplicateCheck, DuplicateIndexStore};
use claims_pipeline::dispatch::{
    AdjusterQueue, AuditEvent, AuditSink, NotificationSender, PayoutExecutor,
};
use claims_pipeline::policy_cache::PolicyPort;

// ============================================================================
// Scoring providers
// ============================================================================

/// Provider that always returns the same score
pub struct FixedProvider {
    name: String,
    score: Decimal,
}

impl FixedProvider {
    pub fn new(name: impl Into<String>, score: Decimal) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

#[async_trait]
impl ScoringProvider for FixedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _features: &FeatureSet) -> Result<Decimal, PortError> {
        Ok(self.score)
    }
}

/// Provider that always fails
pub struct FailingProvider {
    name: String,
}

impl FailingProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl ScoringProvider for FailingProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _features: &FeatureSet) -> Result<Decimal, PortError> {
        Err(PortError::unavailable(self.name.clone()))
    }
}

/// Provider that answers after a delay
pub struct SlowProvider {
    name: String,
    delay: Duration,
    score: Decimal,
}

impl SlowProvider {
    pub fn new(name: impl Into<String>, delay: Duration, score: Decimal) -> Self {
        Self {
            name: name.into(),
            delay,
            score,
        }
    }
}

#[async_trait]
impl ScoringProvider for SlowProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _features: &FeatureSet) -> Result<Decimal, PortError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.score)
    }
}

// ============================================================================
// Policy port
// ============================================================================

/// Policy port backed by a fixed set of snapshots
///
/// Flip [`StaticPolicyPort::set_down`] to simulate an outage.
#[derive(Default)]
pub struct StaticPolicyPort {
    policies: Mutex<HashMap<PolicyId, PolicySnapshot>>,
    down: AtomicBool,
}

impl StaticPolicyPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(self, snapshot: PolicySnapshot) -> Self {
        self.insert(snapshot);
        self
    }

    pub fn insert(&self, snapshot: PolicySnapshot) {
        self.policies
            .lock()
            .expect("policy map lock")
            .insert(snapshot.id, snapshot);
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }
}

#[async_trait]
impl PolicyPort for StaticPolicyPort {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<Option<PolicySnapshot>, PortError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(PortError::unavailable("policy service"));
        }
        Ok(self
            .policies
            .lock()
            .expect("policy map lock")
            .get(&policy_id)
            .cloned())
    }
}

// ============================================================================
// Duplicate index
// ============================================================================

/// Index store that is always unreachable
pub struct BrokenIndexStore;

#[async_trait]
impl DuplicateIndexStore for BrokenIndexStore {
    async fn check_and_register(
        &self,
        _fingerprint: ClaimFingerprint,
    ) -> Result<DuplicateCheck, PortError> {
        Err(PortError::unavailable("duplicate index"))
    }
}

// ============================================================================
// Dispatch collaborators
// ============================================================================

/// Payout executor that records every transfer it was asked to make
#[derive(Default)]
pub struct RecordingPayoutExecutor {
    payouts: Mutex<Vec<(ClaimId, Money)>>,
    down: AtomicBool,
}

impl RecordingPayoutExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn payouts(&self) -> Vec<(ClaimId, Money)> {
        self.payouts.lock().expect("payout lock").clone()
    }
}

#[async_trait]
impl PayoutExecutor for RecordingPayoutExecutor {
    async fn initiate_payout(&self, claim_id: ClaimId, amount: Money) -> Result<(), PortError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(PortError::unavailable("payment rail"));
        }
        self.payouts
            .lock()
            .expect("payout lock")
            .push((claim_id, amount));
        Ok(())
    }
}

/// Adjuster queue that records routed claims with their reasons
#[derive(Default)]
pub struct RecordingAdjusterQueue {
    routed: Mutex<Vec<(ClaimId, Vec<String>)>>,
}

impl RecordingAdjusterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routed(&self) -> Vec<(ClaimId, Vec<String>)> {
        self.routed.lock().expect("adjuster lock").clone()
    }
}

#[async_trait]
impl AdjusterQueue for RecordingAdjusterQueue {
    async fn route_for_review(&self, claim: &Claim, reasons: Vec<String>) -> Result<(), PortError> {
        self.routed
            .lock()
            .expect("adjuster lock")
            .push((claim.id, reasons));
        Ok(())
    }
}

/// Notification sender that records rejection notices
#[derive(Default)]
pub struct RecordingNotificationSender {
    notices: Mutex<Vec<(ClaimId, ClaimantId)>>,
}

impl RecordingNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<(ClaimId, ClaimantId)> {
        self.notices.lock().expect("notice lock").clone()
    }
}

#[async_trait]
impl NotificationSender for RecordingNotificationSender {
    async fn send_rejection_notice(
        &self,
        claim_id: ClaimId,
        claimant_id: ClaimantId,
        _reasons: Vec<String>,
    ) -> Result<(), PortError> {
        self.notices
            .lock()
            .expect("notice lock")
            .push((claim_id, claimant_id));
        Ok(())
    }
}

/// Audit sink that keeps every published event
#[derive(Default)]
pub struct RecordingAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().expect("audit lock").clone()
    }

    pub fn events_for(&self, claim_id: ClaimId) -> Vec<AuditEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.claim_id == claim_id)
            .collect()
    }
}

#[async_trait]
impl AuditSink for RecordingAuditSink {
    async fn publish(&self, event: AuditEvent) -> Result<(), PortError> {
        self.events.lock().expect("audit lock").push(event);
        Ok(())
    }
}
