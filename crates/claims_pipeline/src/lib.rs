//! Claim processing pipeline
//!
//! Orchestrates a submitted claim through policy verification, duplicate
//! detection, risk scoring, decision, and action dispatch. The pipeline
//! owns no business rules of its own; it sequences the stages, enforces
//! idempotency through the outcome ledger, and fails closed when the
//! duplicate index cannot be reached.

pub mod dedupe;
pub mod dispatch;
pub mod error;
pub mod ledger;
pub mod pipeline;
pub mod policy_cache;
pub mod stage;

pub use dedupe::{
    similarity, ClaimFingerprint, DuplicateCheck, DuplicateClaimDetector, DuplicateIndexStore,
    InMemoryDuplicateIndex, DEFAULT_DUPLICATE_RETENTION, DUPLICATE_THRESHOLD,
};
pub use dispatch::{
    ActionDispatcher, AdjusterQueue, AuditEvent, AuditSink, NotificationSender, PayoutExecutor,
};
pub use error::PipelineError;
pub use ledger::{InMemoryOutcomeLedger, LedgerWrite, OutcomeLedger};
pub use pipeline::{ClaimsPipeline, PipelineConfig};
pub use policy_cache::{CachedPolicyStore, InMemoryPolicyPort, PolicyPort, DEFAULT_POLICY_TTL};
pub use stage::ClaimStage;
