//! Policy snapshot
//!
//! The pipeline never owns policy data. It reads a snapshot from the
//! policy collaborator through a bounded-staleness cache; the snapshot
//! carries its fetch time so callers can reason about staleness.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, PolicyId};

use crate::claim::ClaimType;

/// Policy status as reported by the policy service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    Active,
    Inactive,
    Lapsed,
}

/// A cached, eventually-consistent view of a policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub id: PolicyId,
    pub status: PolicyStatus,
    /// Coverage limit per claim type; a missing entry means no coverage
    pub coverage_limits: HashMap<ClaimType, Money>,
    pub deductible: Money,
    /// When this snapshot was read from the policy service
    pub fetched_at: DateTime<Utc>,
}

impl PolicySnapshot {
    pub fn new(
        id: PolicyId,
        status: PolicyStatus,
        coverage_limits: HashMap<ClaimType, Money>,
        deductible: Money,
    ) -> Self {
        Self {
            id,
            status,
            coverage_limits,
            deductible,
            fetched_at: Utc::now(),
        }
    }

    /// True if claims may be made against this policy
    pub fn is_active(&self) -> bool {
        self.status == PolicyStatus::Active
    }

    /// Coverage limit for a claim type, if the type is covered at all
    pub fn coverage_limit_for(&self, claim_type: ClaimType) -> Option<Money> {
        self.coverage_limits.get(&claim_type).copied()
    }

    /// True if the snapshot is older than the given TTL
    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - self.fetched_at > ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    fn snapshot(status: PolicyStatus) -> PolicySnapshot {
        let mut limits = HashMap::new();
        limits.insert(ClaimType::WaterDamage, Money::new(dec!(5000), Currency::USD));
        PolicySnapshot::new(
            PolicyId::new_v7(),
            status,
            limits,
            Money::new(dec!(500), Currency::USD),
        )
    }

    #[test]
    fn active_policy_accepts_claims() {
        assert!(snapshot(PolicyStatus::Active).is_active());
        assert!(!snapshot(PolicyStatus::Inactive).is_active());
        assert!(!snapshot(PolicyStatus::Lapsed).is_active());
    }

    #[test]
    fn missing_coverage_means_none() {
        let snap = snapshot(PolicyStatus::Active);
        assert!(snap.coverage_limit_for(ClaimType::WaterDamage).is_some());
        assert!(snap.coverage_limit_for(ClaimType::Medical).is_none());
    }

    #[test]
    fn staleness_respects_ttl() {
        let snap = snapshot(PolicyStatus::Active);
        let now = Utc::now();
        assert!(!snap.is_stale(Duration::from_secs(300), now));
        assert!(snap.is_stale(Duration::from_secs(300), now + chrono::Duration::seconds(301)));
    }
}
