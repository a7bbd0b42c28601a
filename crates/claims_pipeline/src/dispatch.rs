//! Action dispatch
//!
//! Every decided claim produces exactly one downstream action and
//! exactly one audit event. The executors behind the collaborator
//! traits are idempotent per claim id on their side; the dispatcher
//! still guards against a second in-process attempt, which matters most
//! for payouts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use core_kernel::{AuditEventId, ClaimId, ClaimantId, Money, PortError};
use domain_claims::{ActionTaken, Claim, ClaimOutcome, OutcomeStatus};
use risk_engine::ScoreVector;

/// Immutable record of one claim evaluation, published for audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: AuditEventId,
    pub claim_id: ClaimId,
    pub status: OutcomeStatus,
    /// Blended risk score, absent when the claim never reached scoring
    pub risk_score: Option<Decimal>,
    pub confidence: Decimal,
    /// Per-provider scores, absent when the claim never reached scoring
    pub provider_scores: Option<ScoreVector>,
    pub processing_time_ms: u64,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn for_outcome(outcome: &ClaimOutcome, provider_scores: Option<ScoreVector>) -> Self {
        Self {
            id: AuditEventId::new_v7(),
            claim_id: outcome.claim_id,
            status: outcome.status,
            risk_score: outcome.decision.as_ref().map(|d| d.risk_score),
            confidence: outcome.confidence(),
            provider_scores,
            processing_time_ms: outcome.processing_time_ms,
            occurred_at: Utc::now(),
        }
    }
}

/// Initiates fund transfers for approved claims
#[async_trait]
pub trait PayoutExecutor: Send + Sync {
    async fn initiate_payout(&self, claim_id: ClaimId, amount: Money) -> Result<(), PortError>;
}

/// Routes claims to the human adjuster queue
#[async_trait]
pub trait AdjusterQueue: Send + Sync {
    async fn route_for_review(
        &self,
        claim: &Claim,
        reasons: Vec<String>,
    ) -> Result<(), PortError>;
}

/// Sends rejection notices to claimants
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_rejection_notice(
        &self,
        claim_id: ClaimId,
        claimant_id: ClaimantId,
        reasons: Vec<String>,
    ) -> Result<(), PortError>;
}

/// Receives one audit event per claim evaluation
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn publish(&self, event: AuditEvent) -> Result<(), PortError>;
}

/// Per-claim dispatch bookkeeping
///
/// The action may be retried after a failure; the audit event is
/// published at most once per claim.
#[derive(Debug, Default, Clone, Copy)]
struct DispatchRecord {
    in_flight: bool,
    action_done: bool,
    audited: bool,
}

/// Completed records kept before the bookkeeping map is flushed
///
/// Cross-evaluation idempotency is the outcome ledger's job; the map
/// only has to cover recent and in-flight work, so it can be flushed
/// once it grows past this many claims.
const DEFAULT_RECORD_CAPACITY: usize = 10_000;

/// Dispatches the single action a decided claim calls for
pub struct ActionDispatcher {
    payouts: Arc<dyn PayoutExecutor>,
    adjusters: Arc<dyn AdjusterQueue>,
    notifications: Arc<dyn NotificationSender>,
    audit: Arc<dyn AuditSink>,
    dispatched: Mutex<HashMap<ClaimId, DispatchRecord>>,
    record_capacity: usize,
}

impl ActionDispatcher {
    pub fn new(
        payouts: Arc<dyn PayoutExecutor>,
        adjusters: Arc<dyn AdjusterQueue>,
        notifications: Arc<dyn NotificationSender>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            payouts,
            adjusters,
            notifications,
            audit,
            dispatched: Mutex::new(HashMap::new()),
            record_capacity: DEFAULT_RECORD_CAPACITY,
        }
    }

    /// Overrides the bookkeeping capacity
    pub fn with_record_capacity(mut self, record_capacity: usize) -> Self {
        self.record_capacity = record_capacity;
        self
    }

    #[cfg(test)]
    async fn record_count(&self) -> usize {
        self.dispatched.lock().await.len()
    }

    /// Executes the outcome's action and publishes the audit event
    ///
    /// A call for a claim whose action already completed (or is still
    /// running) is a no-op. After an executor failure the action may be
    /// retried; the audit event is published at most once per claim
    /// regardless.
    ///
    /// # Errors
    ///
    /// Returns the executor's error. The recorded outcome is never
    /// affected by a dispatch failure.
    pub async fn dispatch(
        &self,
        claim: &Claim,
        outcome: &ClaimOutcome,
        provider_scores: Option<&ScoreVector>,
    ) -> Result<(), PortError> {
        let should_audit;
        {
            let mut dispatched = self.dispatched.lock().await;
            let record = dispatched.entry(claim.id).or_default();
            if record.action_done || record.in_flight {
                tracing::debug!(claim_id = %claim.id, "action already dispatched, skipping");
                return Ok(());
            }
            record.in_flight = true;
            should_audit = !record.audited;
            record.audited = true;
        }

        let result = self.run_action(claim, outcome).await;
        {
            let mut dispatched = self.dispatched.lock().await;
            if let Some(record) = dispatched.get_mut(&claim.id) {
                record.in_flight = false;
                record.action_done = result.is_ok();
            }
            // Flush completed records once the map outgrows its capacity;
            // in-flight and retryable entries are kept
            if dispatched.len() > self.record_capacity {
                dispatched.retain(|_, record| record.in_flight || !record.action_done);
            }
        }

        if should_audit {
            let event = AuditEvent::for_outcome(outcome, provider_scores.cloned());
            if let Err(err) = self.audit.publish(event).await {
                // The evaluation stands even if the audit trail lags
                tracing::warn!(claim_id = %claim.id, error = %err, "audit publish failed");
            }
        }

        result
    }

    async fn run_action(&self, claim: &Claim, outcome: &ClaimOutcome) -> Result<(), PortError> {
        match outcome.action_taken {
            ActionTaken::PayoutInitiated => {
                let amount = outcome.payout_amount.ok_or_else(|| {
                    PortError::internal("approved outcome carries no payout amount")
                })?;
                tracing::info!(claim_id = %claim.id, %amount, "initiating payout");
                self.payouts.initiate_payout(claim.id, amount).await
            }
            ActionTaken::RoutedToAdjuster => {
                self.adjusters
                    .route_for_review(claim, review_reasons(outcome))
                    .await
            }
            ActionTaken::RejectionNoticeSent => {
                self.notifications
                    .send_rejection_notice(claim.id, claim.claimant_id, review_reasons(outcome))
                    .await
            }
            ActionTaken::FlaggedDuplicate => {
                // Flagged claims land with an adjuster as well
                self.adjusters
                    .route_for_review(claim, review_reasons(outcome))
                    .await
            }
        }
    }
}

/// Reference executors
///
/// Stand-ins for the payment rail, the adjuster work queue, and the
/// notification service. They log the action and succeed, so the
/// service runs end to end without the external systems. Production
/// deployments register real implementations of the traits instead.
pub mod reference {
    use super::*;

    pub struct LoggingPayoutExecutor;

    #[async_trait]
    impl PayoutExecutor for LoggingPayoutExecutor {
        async fn initiate_payout(&self, claim_id: ClaimId, amount: Money) -> Result<(), PortError> {
            tracing::info!(%claim_id, %amount, "payout initiated");
            Ok(())
        }
    }

    pub struct LoggingAdjusterQueue;

    #[async_trait]
    impl AdjusterQueue for LoggingAdjusterQueue {
        async fn route_for_review(
            &self,
            claim: &Claim,
            reasons: Vec<String>,
        ) -> Result<(), PortError> {
            tracing::info!(claim_id = %claim.id, ?reasons, "claim routed to adjuster queue");
            Ok(())
        }
    }

    pub struct LoggingNotificationSender;

    #[async_trait]
    impl NotificationSender for LoggingNotificationSender {
        async fn send_rejection_notice(
            &self,
            claim_id: ClaimId,
            claimant_id: ClaimantId,
            reasons: Vec<String>,
        ) -> Result<(), PortError> {
            tracing::info!(%claim_id, %claimant_id, ?reasons, "rejection notice sent");
            Ok(())
        }
    }

    /// Audit sink that writes events to the structured log
    pub struct TracingAuditSink;

    #[async_trait]
    impl AuditSink for TracingAuditSink {
        async fn publish(&self, event: AuditEvent) -> Result<(), PortError> {
            tracing::info!(
                event_id = %event.id,
                claim_id = %event.claim_id,
                status = ?event.status,
                risk_score = ?event.risk_score,
                confidence = %event.confidence,
                latency_ms = event.processing_time_ms,
                "claim evaluated"
            );
            Ok(())
        }
    }
}

fn review_reasons(outcome: &ClaimOutcome) -> Vec<String> {
    if let Some(decision) = &outcome.decision {
        return decision.review_reasons.clone();
    }
    match outcome.status {
        OutcomeStatus::Flagged => {
            vec!["similar to a recently submitted claim".to_string()]
        }
        _ => vec!["automated screening unavailable".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{Currency, PolicyId};
    use domain_claims::{ClaimType, GeoPoint};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Recording {
        payouts: AtomicUsize,
        reviews: AtomicUsize,
        rejections: AtomicUsize,
        events: AtomicUsize,
        fail_payouts: bool,
    }

    #[async_trait]
    impl PayoutExecutor for Recording {
        async fn initiate_payout(&self, _: ClaimId, _: Money) -> Result<(), PortError> {
            if self.fail_payouts {
                return Err(PortError::unavailable("payment rail"));
            }
            self.payouts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl AdjusterQueue for Recording {
        async fn route_for_review(&self, _: &Claim, _: Vec<String>) -> Result<(), PortError> {
            self.reviews.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl NotificationSender for Recording {
        async fn send_rejection_notice(
            &self,
            _: ClaimId,
            _: ClaimantId,
            _: Vec<String>,
        ) -> Result<(), PortError> {
            self.rejections.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl AuditSink for Recording {
        async fn publish(&self, _: AuditEvent) -> Result<(), PortError> {
            self.events.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn dispatcher(rec: Arc<Recording>) -> ActionDispatcher {
        ActionDispatcher::new(rec.clone(), rec.clone(), rec.clone(), rec)
    }

    fn claim() -> Claim {
        Claim::new(
            ClaimId::new_v7(),
            PolicyId::new_v7(),
            ClaimantId::new_v7(),
            ClaimType::WaterDamage,
            Utc::now(),
            "Pipe burst in kitchen".to_string(),
            Money::new(dec!(3500), Currency::USD),
            GeoPoint::new(40.7, -74.0),
            vec![],
            None,
        )
        .unwrap()
    }

    fn approved_outcome(claim: &Claim) -> ClaimOutcome {
        ClaimOutcome {
            claim_id: claim.id,
            status: OutcomeStatus::InstantApproved,
            decision: None,
            action_taken: ActionTaken::PayoutInitiated,
            payout_amount: Some(Money::new(dec!(3000), Currency::USD)),
            processing_time_ms: 40,
            decided_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn approval_initiates_exactly_one_payout_and_one_event() {
        let rec = Arc::new(Recording::default());
        let d = dispatcher(rec.clone());
        let c = claim();
        let outcome = approved_outcome(&c);

        d.dispatch(&c, &outcome, None).await.unwrap();
        d.dispatch(&c, &outcome, None).await.unwrap();

        assert_eq!(rec.payouts.load(Ordering::SeqCst), 1);
        assert_eq!(rec.events.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn flagged_claim_goes_to_an_adjuster() {
        let rec = Arc::new(Recording::default());
        let d = dispatcher(rec.clone());
        let c = claim();
        let outcome = ClaimOutcome {
            status: OutcomeStatus::Flagged,
            action_taken: ActionTaken::FlaggedDuplicate,
            payout_amount: None,
            ..approved_outcome(&c)
        };

        d.dispatch(&c, &outcome, None).await.unwrap();
        assert_eq!(rec.reviews.load(Ordering::SeqCst), 1);
        assert_eq!(rec.payouts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_action_may_retry_but_audits_once() {
        let rec = Arc::new(Recording {
            fail_payouts: true,
            ..Recording::default()
        });
        let d = dispatcher(rec.clone());
        let c = claim();
        let outcome = approved_outcome(&c);

        assert!(d.dispatch(&c, &outcome, None).await.is_err());
        assert!(d.dispatch(&c, &outcome, None).await.is_err());

        // The retry ran the action again but did not re-audit
        assert_eq!(rec.events.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn completed_records_are_flushed_at_capacity() {
        let rec = Arc::new(Recording::default());
        let d = dispatcher(rec.clone()).with_record_capacity(4);

        for _ in 0..10 {
            let c = claim();
            let outcome = approved_outcome(&c);
            d.dispatch(&c, &outcome, None).await.unwrap();
        }

        assert_eq!(rec.payouts.load(Ordering::SeqCst), 10);
        assert!(d.record_count().await <= 4);
    }

    #[tokio::test]
    async fn rejection_sends_a_notice() {
        let rec = Arc::new(Recording::default());
        let d = dispatcher(rec.clone());
        let c = claim();
        let outcome = ClaimOutcome {
            status: OutcomeStatus::Rejected,
            action_taken: ActionTaken::RejectionNoticeSent,
            payout_amount: None,
            ..approved_outcome(&c)
        };

        d.dispatch(&c, &outcome, None).await.unwrap();
        assert_eq!(rec.rejections.load(Ordering::SeqCst), 1);
    }
}
