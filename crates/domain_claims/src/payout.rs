//! Payout arithmetic
//!
//! `payout = min(estimated amount, coverage limit) - deductible`, floored
//! at zero. The result is rounded to the currency's standard precision
//! before being handed to the payout executor.

use core_kernel::Money;

use crate::claim::Claim;
use crate::error::ClaimError;
use crate::policy::PolicySnapshot;

/// Calculates the instant-approval payout for a claim under a policy
///
/// # Errors
///
/// Returns [`ClaimError::NotCovered`] if the policy has no coverage for
/// the claim type, and propagates currency mismatches as
/// [`ClaimError::Money`].
pub fn calculate_payout(claim: &Claim, policy: &PolicySnapshot) -> Result<Money, ClaimError> {
    let limit = policy
        .coverage_limit_for(claim.claim_type)
        .ok_or(ClaimError::NotCovered(claim.claim_type))?;

    let capped = claim.estimated_amount.min(&limit)?;
    let payout = capped.saturating_sub(&policy.deductible)?;
    Ok(payout.round_to_currency())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_kernel::{ClaimId, ClaimantId, Currency, PolicyId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    use crate::claim::{ClaimType, GeoPoint};
    use crate::policy::PolicyStatus;

    pub fn claim_for(amount: Decimal) -> Claim {
        Claim::new(
            ClaimId::new_v7(),
            PolicyId::new_v7(),
            ClaimantId::new_v7(),
            ClaimType::WaterDamage,
            Utc::now(),
            "Pipe burst in kitchen".to_string(),
            Money::new(amount, Currency::USD),
            GeoPoint::new(40.7, -74.0),
            vec![],
            None,
        )
        .unwrap()
    }

    pub fn policy_with(limit: Decimal, deductible: Decimal) -> PolicySnapshot {
        let mut limits = HashMap::new();
        limits.insert(ClaimType::WaterDamage, Money::new(limit, Currency::USD));
        PolicySnapshot::new(
            PolicyId::new_v7(),
            PolicyStatus::Active,
            limits,
            Money::new(deductible, Currency::USD),
        )
    }

    #[test]
    fn payout_under_limit() {
        // 3500 claimed, 5000 limit, 500 deductible -> 3000
        let payout = calculate_payout(&claim_for(dec!(3500)), &policy_with(dec!(5000), dec!(500)))
            .unwrap();
        assert_eq!(payout.amount(), dec!(3000));
    }

    #[test]
    fn payout_capped_by_limit() {
        // 8000 claimed, 5000 limit, 500 deductible -> 4500
        let payout = calculate_payout(&claim_for(dec!(8000)), &policy_with(dec!(5000), dec!(500)))
            .unwrap();
        assert_eq!(payout.amount(), dec!(4500));
    }

    #[test]
    fn payout_floored_at_zero() {
        // 100 claimed, deductible 500 -> 0, never negative
        let payout = calculate_payout(&claim_for(dec!(100)), &policy_with(dec!(5000), dec!(500)))
            .unwrap();
        assert!(payout.is_zero());
    }

    #[test]
    fn uncovered_claim_type_errors() {
        let mut policy = policy_with(dec!(5000), dec!(500));
        policy.coverage_limits.clear();

        let result = calculate_payout(&claim_for(dec!(3500)), &policy);
        assert!(matches!(result, Err(ClaimError::NotCovered(_))));
    }
}
