//! Property-Based Test Generators
//!
//! Proptest strategies for the pipeline's domain types. Generated
//! claims always satisfy the intake invariants so strategies compose
//! with the builder without filtering.

use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_claims::ClaimType;

use crate::builders::ClaimBuilder;

/// Any accepted claim type
pub fn claim_type_strategy() -> impl Strategy<Value = ClaimType> {
    prop_oneof![
        Just(ClaimType::Theft),
        Just(ClaimType::WaterDamage),
        Just(ClaimType::Fire),
        Just(ClaimType::Liability),
        Just(ClaimType::Medical),
    ]
}

/// A claim amount inside the accepted range, in whole major units
pub fn claim_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000).prop_map(|n| Decimal::new(n, 0))
}

/// A coordinate pair anywhere on the globe
pub fn location_strategy() -> impl Strategy<Value = (f64, f64)> {
    (-90.0f64..=90.0, -180.0f64..=180.0)
}

/// A plausible free-text loss description
pub fn description_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{2,10}", 1..12).prop_map(|words| words.join(" "))
}

/// A fully valid claim
pub fn claim_strategy() -> impl Strategy<Value = domain_claims::Claim> {
    (
        claim_type_strategy(),
        claim_amount_strategy(),
        location_strategy(),
        description_strategy(),
    )
        .prop_map(|(claim_type, amount, (lat, lng), description)| {
            ClaimBuilder::new()
                .with_claim_type(claim_type)
                .with_amount(amount)
                .with_location(lat, lng)
                .with_description(description)
                .build()
        })
}
