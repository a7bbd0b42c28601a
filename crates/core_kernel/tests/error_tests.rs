//! Integration tests for error types

use core_kernel::{CoreError, PortError, Money, Currency};
use rust_decimal_macros::dec;

#[test]
fn money_error_converts_to_core_error() {
    let usd = Money::new(dec!(1), Currency::USD);
    let eur = Money::new(dec!(1), Currency::EUR);

    let err: CoreError = usd.checked_add(&eur).unwrap_err().into();
    assert!(matches!(err, CoreError::Money(_)));
}

#[test]
fn port_error_converts_to_core_error() {
    let err: CoreError = PortError::unavailable("scoring").into();
    assert!(matches!(err, CoreError::Port(_)));
}

#[test]
fn transient_classification_drives_degradation() {
    // The pipeline treats transient collaborator failures as degradation,
    // not as claim rejection. The classification lives here.
    for err in [
        PortError::connection("refused"),
        PortError::timeout("score", 150),
        PortError::unavailable("index"),
    ] {
        assert!(err.is_transient(), "{err} should be transient");
    }

    for err in [
        PortError::validation("bad"),
        PortError::not_found("Policy", "x"),
        PortError::internal("bug"),
    ] {
        assert!(!err.is_transient(), "{err} should not be transient");
    }
}
