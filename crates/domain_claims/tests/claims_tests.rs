//! Comprehensive tests for domain_claims

use chrono::Utc;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use core_kernel::{ClaimId, ClaimantId, Currency, Money, PolicyId};

use domain_claims::claim::{Claim, ClaimType, GeoPoint};
use domain_claims::decision::{ClaimAction, RiskDecision, RiskLevel};
use domain_claims::outcome::{ActionTaken, ClaimOutcome, OutcomeStatus};
use domain_claims::payout::calculate_payout;
use domain_claims::policy::{PolicySnapshot, PolicyStatus};

fn test_claim(claim_type: ClaimType, amount: Money) -> Claim {
    Claim::new(
        ClaimId::new_v7(),
        PolicyId::new_v7(),
        ClaimantId::new_v7(),
        claim_type,
        Utc::now(),
        "Pipe burst in kitchen causing floor damage".to_string(),
        amount,
        GeoPoint::new(40.7128, -74.0060),
        vec!["s3://claims-photos/1.jpg".to_string()],
        None,
    )
    .unwrap()
}

fn test_policy(deductible: Money) -> PolicySnapshot {
    let mut limits = HashMap::new();
    for claim_type in ClaimType::all() {
        limits.insert(claim_type, Money::new(dec!(5000), Currency::USD));
    }
    PolicySnapshot::new(PolicyId::new_v7(), PolicyStatus::Active, limits, deductible)
}

// ============================================================================
// Claim Tests
// ============================================================================

mod claim_tests {
    use super::*;

    #[test]
    fn test_claim_construction() {
        let claim = test_claim(ClaimType::WaterDamage, Money::new(dec!(2000), Currency::USD));
        assert_eq!(claim.claim_type, ClaimType::WaterDamage);
        assert!(claim.has_evidence());
        assert!(claim.submitted_at <= Utc::now());
    }

    #[test]
    fn test_all_claim_types_serialize() {
        for claim_type in ClaimType::all() {
            let json = serde_json::to_string(&claim_type).unwrap();
            assert!(!json.is_empty());
        }
    }

    #[test]
    fn test_claim_serde_round_trip() {
        let claim = test_claim(ClaimType::Theft, Money::new(dec!(750), Currency::USD));
        let json = serde_json::to_string(&claim).unwrap();
        let back: Claim = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, claim.id);
        assert_eq!(back.estimated_amount, claim.estimated_amount);
    }
}

// ============================================================================
// Payout Tests
// ============================================================================

mod payout_tests {
    use super::*;

    #[test]
    fn test_payout_reference_case() {
        let claim = test_claim(ClaimType::WaterDamage, Money::new(dec!(3500), Currency::USD));
        let policy = test_policy(Money::new(dec!(500), Currency::USD));

        let payout = calculate_payout(&claim, &policy).unwrap();
        assert_eq!(payout.amount(), dec!(3000));
    }

    #[test]
    fn test_payout_small_claim_floors_at_zero() {
        let claim = test_claim(ClaimType::WaterDamage, Money::new(dec!(100), Currency::USD));
        let policy = test_policy(Money::new(dec!(500), Currency::USD));

        let payout = calculate_payout(&claim, &policy).unwrap();
        assert!(payout.is_zero());
    }
}

// ============================================================================
// Decision / Outcome Tests
// ============================================================================

mod decision_tests {
    use super::*;

    fn decision(action: ClaimAction) -> RiskDecision {
        RiskDecision {
            risk_score: dec!(0.1),
            risk_level: RiskLevel::Low,
            anomaly: false,
            confidence: dec!(0.9),
            action,
            review_reasons: vec![],
            config_version: "v1".to_string(),
        }
    }

    #[test]
    fn test_outcome_carries_confidence() {
        let outcome = ClaimOutcome {
            claim_id: ClaimId::new_v7(),
            status: OutcomeStatus::InstantApproved,
            decision: Some(decision(ClaimAction::InstantApprove)),
            action_taken: ActionTaken::PayoutInitiated,
            payout_amount: Some(Money::new(dec!(3000), Currency::USD)),
            processing_time_ms: 210,
            decided_at: Utc::now(),
        };

        assert_eq!(outcome.confidence(), dec!(0.9));
    }

    #[test]
    fn test_flagged_outcome_has_no_decision() {
        let outcome = ClaimOutcome {
            claim_id: ClaimId::new_v7(),
            status: OutcomeStatus::Flagged,
            decision: None,
            action_taken: ActionTaken::FlaggedDuplicate,
            payout_amount: None,
            processing_time_ms: 12,
            decided_at: Utc::now(),
        };

        assert_eq!(outcome.confidence(), dec!(0));
        assert!(outcome.status.next_steps().contains("similarity"));
    }

    #[test]
    fn test_outcome_serde_round_trip() {
        let outcome = ClaimOutcome {
            claim_id: ClaimId::new_v7(),
            status: OutcomeStatus::UnderReview,
            decision: Some(decision(ClaimAction::Review)),
            action_taken: ActionTaken::RoutedToAdjuster,
            payout_amount: None,
            processing_time_ms: 340,
            decided_at: Utc::now(),
        };

        let json = serde_json::to_string(&outcome).unwrap();
        let back: ClaimOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back.claim_id, outcome.claim_id);
        assert_eq!(back.status, OutcomeStatus::UnderReview);
    }
}
