//! Core Kernel - Foundational types and utilities for the claims platform
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money types with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port error contracts shared by all collaborator handles

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use identifiers::{ClaimId, PolicyId, ClaimantId, AuditEventId};
pub use ports::PortError;
pub use error::CoreError;
