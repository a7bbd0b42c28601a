//! Integration tests for typed identifiers

use core_kernel::{ClaimId, ClaimantId, PolicyId};
use std::collections::HashSet;

#[test]
fn claim_ids_are_unique() {
    let ids: HashSet<ClaimId> = (0..1000).map(|_| ClaimId::new_v7()).collect();
    assert_eq!(ids.len(), 1000);
}

#[test]
fn prefixes_differ_per_domain() {
    assert_eq!(ClaimId::prefix(), "CLM");
    assert_eq!(PolicyId::prefix(), "POL");
    assert_eq!(ClaimantId::prefix(), "CLT");
}

#[test]
fn serde_is_transparent() {
    let id = ClaimId::new_v7();
    let json = serde_json::to_string(&id).unwrap();
    // Serialized as a bare UUID string, no prefix
    assert!(json.contains(&id.as_uuid().to_string()));

    let back: ClaimId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}
