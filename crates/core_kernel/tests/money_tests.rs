//! Integration tests for money types

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal_macros::dec;

#[test]
fn payout_style_arithmetic() {
    // min(claimed, limit) - deductible, floored at zero
    let claimed = Money::new(dec!(3500), Currency::USD);
    let limit = Money::new(dec!(5000), Currency::USD);
    let deductible = Money::new(dec!(500), Currency::USD);

    let payout = claimed
        .min(&limit)
        .unwrap()
        .saturating_sub(&deductible)
        .unwrap();
    assert_eq!(payout.amount(), dec!(3000));
}

#[test]
fn payout_never_negative() {
    let claimed = Money::new(dec!(100), Currency::USD);
    let limit = Money::new(dec!(5000), Currency::USD);
    let deductible = Money::new(dec!(500), Currency::USD);

    let payout = claimed
        .min(&limit)
        .unwrap()
        .saturating_sub(&deductible)
        .unwrap();
    assert!(payout.is_zero());
}

#[test]
fn mixed_currency_is_rejected() {
    let usd = Money::new(dec!(100), Currency::USD);
    let gbp = Money::new(dec!(100), Currency::GBP);

    assert!(matches!(
        usd.min(&gbp),
        Err(MoneyError::CurrencyMismatch(_, _))
    ));
    assert!(matches!(
        usd.saturating_sub(&gbp),
        Err(MoneyError::CurrencyMismatch(_, _))
    ));
}

#[test]
fn rounding_to_currency() {
    let m = Money::new(dec!(10.2345), Currency::USD);
    assert_eq!(m.round_to_currency().amount(), dec!(10.23));
}

#[test]
fn serde_round_trip() {
    let m = Money::new(dec!(1234.56), Currency::USD);
    let json = serde_json::to_string(&m).unwrap();
    let back: Money = serde_json::from_str(&json).unwrap();
    assert_eq!(m, back);
}
