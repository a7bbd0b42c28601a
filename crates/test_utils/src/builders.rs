//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the fields they care about; everything else is a
//! modest, well-documented water-damage claim against an active policy
//! that covers it.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use core_kernel::{ClaimId, ClaimantId, Currency, Money, PolicyId};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use domain_claims::{Claim, ClaimType, GeoPoint, PolicySnapshot, PolicyStatus};

/// Builder for submitted claims
pub struct ClaimBuilder {
    id: ClaimId,
    policy_id: PolicyId,
    claimant_id: ClaimantId,
    claim_type: ClaimType,
    incident_date: DateTime<Utc>,
    description: String,
    amount: Money,
    location: GeoPoint,
    photos: Vec<String>,
    video_evidence_url: Option<String>,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a builder for a clean, well-evidenced water-damage claim
    pub fn new() -> Self {
        Self {
            id: ClaimId::new_v7(),
            policy_id: PolicyId::new_v7(),
            claimant_id: ClaimantId::new_v7(),
            claim_type: ClaimType::WaterDamage,
            incident_date: Utc::now() - Duration::hours(8),
            description: "Pipe burst in kitchen causing floor damage".to_string(),
            amount: Money::new(dec!(2000), Currency::USD),
            location: GeoPoint::new(40.7128, -74.0060),
            photos: vec!["s3://claims-photos/kitchen.jpg".to_string()],
            video_evidence_url: Some("s3://claims-videos/kitchen.mp4".to_string()),
        }
    }

    pub fn with_id(mut self, id: ClaimId) -> Self {
        self.id = id;
        self
    }

    pub fn with_policy_id(mut self, id: PolicyId) -> Self {
        self.policy_id = id;
        self
    }

    pub fn with_claimant_id(mut self, id: ClaimantId) -> Self {
        self.claimant_id = id;
        self
    }

    pub fn with_claim_type(mut self, claim_type: ClaimType) -> Self {
        self.claim_type = claim_type;
        self
    }

    pub fn with_incident_date(mut self, date: DateTime<Utc>) -> Self {
        self.incident_date = date;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Money::new(amount, Currency::USD);
        self
    }

    pub fn with_location(mut self, lat: f64, lng: f64) -> Self {
        self.location = GeoPoint::new(lat, lng);
        self
    }

    pub fn with_photos(mut self, photos: Vec<String>) -> Self {
        self.photos = photos;
        self
    }

    pub fn without_evidence(mut self) -> Self {
        self.photos = Vec::new();
        self.video_evidence_url = None;
        self
    }

    /// Builds the claim; panics if the configured fields are invalid
    pub fn build(self) -> Claim {
        Claim::new(
            self.id,
            self.policy_id,
            self.claimant_id,
            self.claim_type,
            self.incident_date,
            self.description,
            self.amount,
            self.location,
            self.photos,
            self.video_evidence_url,
        )
        .expect("builder produced an invalid claim")
    }
}

/// Builder for policy snapshots
pub struct PolicyBuilder {
    id: PolicyId,
    status: PolicyStatus,
    coverage_limits: HashMap<ClaimType, Money>,
    deductible: Money,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyBuilder {
    /// Creates a builder for an active policy covering every claim type
    /// at a 5000 USD limit with a 500 USD deductible
    pub fn new() -> Self {
        let mut coverage_limits = HashMap::new();
        for claim_type in ClaimType::all() {
            coverage_limits.insert(claim_type, Money::new(dec!(5000), Currency::USD));
        }
        Self {
            id: PolicyId::new_v7(),
            status: PolicyStatus::Active,
            coverage_limits,
            deductible: Money::new(dec!(500), Currency::USD),
        }
    }

    pub fn with_id(mut self, id: PolicyId) -> Self {
        self.id = id;
        self
    }

    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = status;
        self
    }

    /// Replaces the coverage table with a single entry
    pub fn covering_only(mut self, claim_type: ClaimType, limit: Decimal) -> Self {
        self.coverage_limits.clear();
        self.coverage_limits
            .insert(claim_type, Money::new(limit, Currency::USD));
        self
    }

    pub fn with_limit(mut self, claim_type: ClaimType, limit: Decimal) -> Self {
        self.coverage_limits
            .insert(claim_type, Money::new(limit, Currency::USD));
        self
    }

    pub fn with_deductible(mut self, deductible: Decimal) -> Self {
        self.deductible = Money::new(deductible, Currency::USD);
        self
    }

    pub fn build(self) -> PolicySnapshot {
        PolicySnapshot::new(self.id, self.status, self.coverage_limits, self.deductible)
    }
}
