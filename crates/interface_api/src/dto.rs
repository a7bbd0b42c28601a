//! Request/response data transfer objects

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{ClaimId, ClaimantId, Currency, Money, PolicyId};
use domain_claims::{Claim, ClaimError, ClaimOutcome, ClaimType, GeoPoint, OutcomeStatus};

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LocationDto {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub struct SubmitClaimRequest {
    /// Optional client-supplied idempotency key; generated when absent
    pub claim_id: Option<Uuid>,
    pub policy_id: Uuid,
    pub claimant_id: Uuid,
    pub claim_type: ClaimType,
    pub incident_date: DateTime<Utc>,
    pub description: String,
    pub estimated_amount: Decimal,
    #[serde(default)]
    pub currency: Option<Currency>,
    pub location: LocationDto,
    #[serde(default)]
    pub photos: Vec<String>,
    pub video_evidence_url: Option<String>,
}

impl SubmitClaimRequest {
    /// Validates the request into a pipeline-ready claim
    pub fn into_claim(self) -> Result<Claim, ClaimError> {
        let claim_id = self
            .claim_id
            .map(ClaimId::from_uuid)
            .unwrap_or_else(ClaimId::new_v7);
        let currency = self.currency.unwrap_or(Currency::USD);

        Claim::new(
            claim_id,
            PolicyId::from_uuid(self.policy_id),
            ClaimantId::from_uuid(self.claimant_id),
            self.claim_type,
            self.incident_date,
            self.description,
            Money::new(self.estimated_amount, currency),
            GeoPoint::new(self.location.lat, self.location.lng),
            self.photos,
            self.video_evidence_url,
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ClaimDecisionResponse {
    pub claim_id: Uuid,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout_amount: Option<Decimal>,
    pub confidence_score: Decimal,
    pub processing_time_ms: u64,
    pub next_steps: String,
}

impl ClaimDecisionResponse {
    pub fn from_outcome(outcome: &ClaimOutcome) -> Self {
        Self {
            claim_id: (*outcome.claim_id.as_uuid()),
            status: outcome.status,
            payout_amount: outcome.payout_amount.map(|m| m.amount()),
            confidence_score: outcome.confidence(),
            processing_time_ms: outcome.processing_time_ms,
            next_steps: outcome.status.next_steps().to_string(),
        }
    }
}
