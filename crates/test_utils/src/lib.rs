//! Test Utilities Crate
//!
//! Shared test infrastructure for the pipeline test suites.
//!
//! # Modules
//!
//! - `builders`: builder patterns for claims and policy snapshots
//! - `fakes`: fake scoring providers and pipeline collaborators
//! - `generators`: property-based test data generators

pub mod builders;
pub mod fakes;
pub mod generators;

pub use builders::*;
pub use fakes::*;
pub use generators::*;
