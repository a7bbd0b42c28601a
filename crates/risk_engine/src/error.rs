//! Risk engine errors

use thiserror::Error;

/// Errors raised while configuring or running the risk engine
#[derive(Debug, Error)]
pub enum RiskEngineError {
    #[error("Invalid ensemble configuration: {0}")]
    InvalidConfig(String),
}
