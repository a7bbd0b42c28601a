//! Claim value object
//!
//! A claim is immutable once submitted. Validation happens exactly once,
//! at construction of the pipeline's unit of work; everything downstream
//! can rely on the invariants holding.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, ClaimantId, Money, PolicyId};

use crate::error::ClaimError;

/// Absolute ceiling on a single claimed amount, in major units.
///
/// Amounts at or above this are rejected at intake regardless of policy
/// coverage. Matches the upper bound enforced by the submission API.
pub const MAX_CLAIM_AMOUNT: Decimal = dec!(1_000_000);

/// Closed set of claim types the pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    Theft,
    WaterDamage,
    Fire,
    Liability,
    Medical,
}

impl ClaimType {
    /// All claim types, in a stable order
    pub fn all() -> [ClaimType; 5] {
        [
            ClaimType::Theft,
            ClaimType::WaterDamage,
            ClaimType::Fire,
            ClaimType::Liability,
            ClaimType::Medical,
        ]
    }
}

/// A WGS84 coordinate attached to a claim
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to another point, in kilometres (haversine)
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

/// A submitted insurance claim
///
/// Fields are public for read access but the struct is only constructed
/// through [`Claim::new`], which enforces the intake invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier; doubles as the idempotency key
    pub id: ClaimId,
    /// Policy the claim is made against
    pub policy_id: PolicyId,
    /// Claimant
    pub claimant_id: ClaimantId,
    /// Type of loss
    pub claim_type: ClaimType,
    /// When the incident occurred
    pub incident_date: DateTime<Utc>,
    /// Free-text description of the loss
    pub description: String,
    /// Claimed amount; positive and below [`MAX_CLAIM_AMOUNT`]
    pub estimated_amount: Money,
    /// Where the incident occurred
    pub location: GeoPoint,
    /// Photo evidence URIs
    pub photos: Vec<String>,
    /// Optional video evidence URI
    pub video_evidence_url: Option<String>,
    /// When the claim was submitted
    pub submitted_at: DateTime<Utc>,
}

impl Claim {
    /// Creates a validated claim
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidAmount`] if the estimated amount is
    /// not strictly positive or reaches the absolute ceiling, and
    /// [`ClaimError::InvalidField`] for an empty description or an
    /// out-of-range coordinate.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ClaimId,
        policy_id: PolicyId,
        claimant_id: ClaimantId,
        claim_type: ClaimType,
        incident_date: DateTime<Utc>,
        description: String,
        estimated_amount: Money,
        location: GeoPoint,
        photos: Vec<String>,
        video_evidence_url: Option<String>,
    ) -> Result<Self, ClaimError> {
        if !estimated_amount.is_positive() {
            return Err(ClaimError::InvalidAmount(
                "estimated amount must be positive".to_string(),
            ));
        }
        if estimated_amount.amount() >= MAX_CLAIM_AMOUNT {
            return Err(ClaimError::InvalidAmount(format!(
                "estimated amount must be below {MAX_CLAIM_AMOUNT}"
            )));
        }
        if description.trim().is_empty() {
            return Err(ClaimError::InvalidField {
                field: "description".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if !(-90.0..=90.0).contains(&location.lat) || !(-180.0..=180.0).contains(&location.lng) {
            return Err(ClaimError::InvalidField {
                field: "location".to_string(),
                message: "coordinates out of range".to_string(),
            });
        }

        Ok(Self {
            id,
            policy_id,
            claimant_id,
            claim_type,
            incident_date,
            description,
            estimated_amount,
            location,
            photos,
            video_evidence_url,
            submitted_at: Utc::now(),
        })
    }

    /// True if the claim carries any photo or video evidence
    pub fn has_evidence(&self) -> bool {
        !self.photos.is_empty() || self.video_evidence_url.is_some()
    }
}
