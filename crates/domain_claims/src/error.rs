//! Claims domain errors

use thiserror::Error;

use core_kernel::MoneyError;

use crate::claim::ClaimType;

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Policy has no coverage for claim type {0:?}")]
    NotCovered(ClaimType),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}
