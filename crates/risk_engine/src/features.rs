//! Feature extraction
//!
//! Providers never see the raw claim. They receive a flat feature set so
//! that provider implementations stay decoupled from the claim schema and
//! can be exercised in tests without constructing full claims.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, ClaimantId};
use domain_claims::{Claim, ClaimType, GeoPoint};

/// Model-ready view of a claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSet {
    pub claim_id: ClaimId,
    pub claimant_id: ClaimantId,
    pub claim_type: ClaimType,
    /// Claimed amount in major units
    pub amount: Decimal,
    /// Hours between the incident and the submission
    pub report_delay_hours: i64,
    pub description_word_count: usize,
    pub photo_count: usize,
    pub has_video: bool,
    pub location: GeoPoint,
    pub submitted_at: DateTime<Utc>,
}

impl FeatureSet {
    /// Extracts features from a validated claim
    pub fn from_claim(claim: &Claim) -> Self {
        let report_delay_hours = (claim.submitted_at - claim.incident_date)
            .num_hours()
            .max(0);

        Self {
            claim_id: claim.id,
            claimant_id: claim.claimant_id,
            claim_type: claim.claim_type,
            amount: claim.estimated_amount.amount(),
            report_delay_hours,
            description_word_count: claim.description.split_whitespace().count(),
            photo_count: claim.photos.len(),
            has_video: claim.video_evidence_url.is_some(),
            location: claim.location,
            submitted_at: claim.submitted_at,
        }
    }
}
