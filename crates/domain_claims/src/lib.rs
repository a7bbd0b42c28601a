//! Claims Domain
//!
//! This crate implements the value objects of the claims risk-decision
//! pipeline: the immutable submitted claim, the cached policy snapshot it
//! is validated against, the risk decision produced by the ensemble, the
//! persisted outcome record, and the payout arithmetic that turns an
//! approval into an amount.
//!
//! # Decision flow
//!
//! ```text
//! Claim -> policy check -> duplicate check -> scoring -> RiskDecision -> ClaimOutcome
//! ```

pub mod claim;
pub mod policy;
pub mod decision;
pub mod payout;
pub mod outcome;
pub mod error;

pub use claim::{Claim, ClaimType, GeoPoint, MAX_CLAIM_AMOUNT};
pub use policy::{PolicySnapshot, PolicyStatus};
pub use decision::{RiskDecision, RiskLevel, ClaimAction};
pub use payout::calculate_payout;
pub use outcome::{ClaimOutcome, ActionTaken, OutcomeStatus};
pub use error::ClaimError;
