//! Duplicate claim detection
//!
//! A claimant filing two near-identical claims in quick succession is
//! either a retry gone wrong or an attempt to collect twice. The
//! detector compares each incoming claim against the claimant's recent
//! claims and flags it when the weighted similarity clears the
//! threshold.
//!
//! The store trait exposes a single compound operation: the comparison
//! and the registration of a non-duplicate happen inside one critical
//! section. Two near-identical claims racing each other therefore
//! resolve deterministically; one registers, the other is flagged.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use core_kernel::{ClaimId, ClaimantId, PortError};
use domain_claims::{Claim, GeoPoint};

/// Similarity at or above which a claim is flagged as a duplicate
pub const DUPLICATE_THRESHOLD: f64 = 0.85;

/// How long an index entry keeps participating in comparisons
pub const DEFAULT_DUPLICATE_RETENTION: Duration = Duration::from_secs(30 * 24 * 60 * 60);

// Similarity component weights; they sum to 1.
const TEXT_WEIGHT: f64 = 0.4;
const AMOUNT_WEIGHT: f64 = 0.25;
const SPATIAL_WEIGHT: f64 = 0.2;
const TEMPORAL_WEIGHT: f64 = 0.15;

// Distances at which the spatial/temporal components reach zero.
const SPATIAL_CUTOFF_KM: f64 = 50.0;
const TEMPORAL_CUTOFF_DAYS: f64 = 30.0;

/// What the duplicate index remembers about a processed claim
#[derive(Debug, Clone)]
pub struct ClaimFingerprint {
    pub claim_id: ClaimId,
    pub claimant_id: ClaimantId,
    /// Lowercased description tokens
    pub tokens: BTreeSet<String>,
    pub amount: Decimal,
    pub location: GeoPoint,
    pub incident_date: DateTime<Utc>,
    pub recorded_at: DateTime<Utc>,
}

impl ClaimFingerprint {
    pub fn of(claim: &Claim) -> Self {
        let tokens = claim
            .description
            .to_lowercase()
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Self {
            claim_id: claim.id,
            claimant_id: claim.claimant_id,
            tokens,
            amount: claim.estimated_amount.amount(),
            location: claim.location,
            incident_date: claim.incident_date,
            recorded_at: Utc::now(),
        }
    }
}

/// Weighted similarity between two fingerprints, in [0,1]
///
/// Combines description token overlap (Jaccard), relative amount
/// proximity, spatial proximity of the incident locations, and
/// incident-date proximity.
pub fn similarity(a: &ClaimFingerprint, b: &ClaimFingerprint) -> f64 {
    TEXT_WEIGHT * text_similarity(&a.tokens, &b.tokens)
        + AMOUNT_WEIGHT * amount_similarity(a.amount, b.amount)
        + SPATIAL_WEIGHT * spatial_similarity(&a.location, &b.location)
        + TEMPORAL_WEIGHT * temporal_similarity(a.incident_date, b.incident_date)
}

fn text_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}

fn amount_similarity(a: Decimal, b: Decimal) -> f64 {
    let larger = a.max(b);
    if larger.is_zero() {
        return 1.0;
    }
    let ratio = ((a - b).abs() / larger).to_f64().unwrap_or(1.0);
    (1.0 - ratio).max(0.0)
}

fn spatial_similarity(a: &GeoPoint, b: &GeoPoint) -> f64 {
    (1.0 - a.distance_km(b) / SPATIAL_CUTOFF_KM).max(0.0)
}

fn temporal_similarity(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    let days = (a - b).num_seconds().abs() as f64 / 86_400.0;
    (1.0 - days / TEMPORAL_CUTOFF_DAYS).max(0.0)
}

/// Result of one check-and-register call
#[derive(Debug, Clone)]
pub struct DuplicateCheck {
    pub is_duplicate: bool,
    /// Highest similarity against the claimant's recent claims
    pub similarity: f64,
    /// The claim this one duplicates, when flagged
    pub matched_claim_id: Option<ClaimId>,
}

impl DuplicateCheck {
    pub fn original(best_similarity: f64) -> Self {
        Self {
            is_duplicate: false,
            similarity: best_similarity,
            matched_claim_id: None,
        }
    }

    pub fn duplicate_of(claim_id: ClaimId, similarity: f64) -> Self {
        Self {
            is_duplicate: true,
            similarity,
            matched_claim_id: Some(claim_id),
        }
    }
}

/// Storage for the sliding-window duplicate index
///
/// The trait exposes the check and the registration as one compound
/// operation; implementations must make it atomic. A fingerprint that
/// matches an existing entry at or above the threshold is flagged and
/// never registered.
#[async_trait]
pub trait DuplicateIndexStore: Send + Sync {
    async fn check_and_register(
        &self,
        fingerprint: ClaimFingerprint,
    ) -> Result<DuplicateCheck, PortError>;
}

/// In-process duplicate index, partitioned by claimant
///
/// Entries expire after the retention window and are pruned lazily on
/// the next check for the same claimant. The whole compare-and-insert
/// runs under one async mutex; the critical section never awaits
/// anything external.
pub struct InMemoryDuplicateIndex {
    threshold: f64,
    retention: Duration,
    entries: Mutex<HashMap<ClaimantId, Vec<ClaimFingerprint>>>,
}

impl InMemoryDuplicateIndex {
    pub fn new(threshold: f64, retention: Duration) -> Self {
        Self {
            threshold,
            retention,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryDuplicateIndex {
    fn default() -> Self {
        Self::new(DUPLICATE_THRESHOLD, DEFAULT_DUPLICATE_RETENTION)
    }
}

#[async_trait]
impl DuplicateIndexStore for InMemoryDuplicateIndex {
    async fn check_and_register(
        &self,
        fingerprint: ClaimFingerprint,
    ) -> Result<DuplicateCheck, PortError> {
        let now = Utc::now();
        let horizon = now
            - chrono::Duration::from_std(self.retention)
                .map_err(|e| PortError::internal(format!("retention out of range: {e}")))?;

        let mut entries = self.entries.lock().await;
        let bucket = entries.entry(fingerprint.claimant_id).or_default();
        bucket.retain(|entry| entry.recorded_at > horizon);

        // A resubmission under the same claim id is the ledger's concern,
        // not a duplicate of itself.
        let best = bucket
            .iter()
            .filter(|entry| entry.claim_id != fingerprint.claim_id)
            .map(|entry| (entry.claim_id, similarity(entry, &fingerprint)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b));

        match best {
            Some((matched, score)) if score >= self.threshold => {
                Ok(DuplicateCheck::duplicate_of(matched, score))
            }
            other => {
                bucket.push(fingerprint);
                Ok(DuplicateCheck::original(
                    other.map(|(_, score)| score).unwrap_or(0.0),
                ))
            }
        }
    }
}

/// Front door of duplicate detection
///
/// Thin wrapper over the index store; owns the logging and keeps the
/// pipeline decoupled from the storage backend.
#[derive(Clone)]
pub struct DuplicateClaimDetector {
    store: Arc<dyn DuplicateIndexStore>,
}

impl DuplicateClaimDetector {
    pub fn new(store: Arc<dyn DuplicateIndexStore>) -> Self {
        Self { store }
    }

    /// Checks a claim against the claimant's recent claims
    ///
    /// # Errors
    ///
    /// Propagates store failures; callers must treat an error as "cannot
    /// verify" and fail closed.
    pub async fn check_and_register(&self, claim: &Claim) -> Result<DuplicateCheck, PortError> {
        let check = self
            .store
            .check_and_register(ClaimFingerprint::of(claim))
            .await?;

        if check.is_duplicate {
            tracing::info!(
                claim_id = %claim.id,
                matched = ?check.matched_claim_id,
                similarity = check.similarity,
                "claim flagged as duplicate"
            );
        }
        Ok(check)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn fingerprint(
        words: Vec<String>,
        amount: i64,
        lat: f64,
        lng: f64,
        days_ago: i64,
    ) -> ClaimFingerprint {
        ClaimFingerprint {
            claim_id: ClaimId::new_v7(),
            claimant_id: ClaimantId::new_v7(),
            tokens: words.into_iter().collect(),
            amount: Decimal::new(amount, 0),
            location: GeoPoint::new(lat, lng),
            incident_date: Utc::now() - chrono::Duration::days(days_ago),
            recorded_at: Utc::now(),
        }
    }

    proptest! {
        #[test]
        fn similarity_stays_in_unit_interval(
            words_a in proptest::collection::vec("[a-z]{1,8}", 0..10),
            words_b in proptest::collection::vec("[a-z]{1,8}", 0..10),
            amount_a in 1i64..1_000_000,
            amount_b in 1i64..1_000_000,
            lat_a in -89.0f64..89.0,
            lat_b in -89.0f64..89.0,
            days_a in 0i64..365,
            days_b in 0i64..365,
        ) {
            let a = fingerprint(words_a, amount_a, lat_a, 10.0, days_a);
            let b = fingerprint(words_b, amount_b, lat_b, 10.0, days_b);

            let s = similarity(&a, &b);
            prop_assert!((0.0..=1.0).contains(&s), "similarity was {s}");
            // Symmetry
            prop_assert!((s - similarity(&b, &a)).abs() < 1e-9);
        }
    }
}
