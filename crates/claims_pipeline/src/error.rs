//! Pipeline errors

use thiserror::Error;

use core_kernel::{PolicyId, PortError};
use domain_claims::ClaimError;

/// Errors surfaced to the caller of the pipeline
///
/// Client errors (bad claim, bad policy) carry no side effects; the
/// claim can be corrected and resubmitted. Port errors indicate a
/// collaborator outage the caller may retry.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Policy {0} not found")]
    PolicyNotFound(PolicyId),

    #[error("Policy {0} is not active")]
    PolicyInactive(PolicyId),

    #[error(transparent)]
    Claim(#[from] ClaimError),

    #[error(transparent)]
    Port(#[from] PortError),
}

impl PipelineError {
    /// True if the caller sent something we will never accept as-is
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::PolicyNotFound(_)
                | PipelineError::PolicyInactive(_)
                | PipelineError::Claim(_)
        )
    }
}
