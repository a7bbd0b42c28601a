//! Policy port and bounded-staleness cache
//!
//! The pipeline reads policy data through `PolicyPort` and never writes
//! it. The cache keeps a snapshot per policy for a fixed TTL; a snapshot
//! older than the TTL is refetched, so a policy change is visible within
//! one TTL at the latest.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use core_kernel::{PolicyId, PortError};
use domain_claims::PolicySnapshot;

/// How long a cached policy snapshot may be served
pub const DEFAULT_POLICY_TTL: Duration = Duration::from_secs(300);

/// Read-only handle to the policy system of record
#[async_trait]
pub trait PolicyPort: Send + Sync {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<Option<PolicySnapshot>, PortError>;
}

/// TTL cache in front of a [`PolicyPort`]
///
/// A fetch failure is propagated, never papered over with an expired
/// snapshot; the staleness bound holds unconditionally.
pub struct CachedPolicyStore {
    inner: Arc<dyn PolicyPort>,
    ttl: Duration,
    cache: Mutex<HashMap<PolicyId, PolicySnapshot>>,
}

impl CachedPolicyStore {
    pub fn new(inner: Arc<dyn PolicyPort>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the policy snapshot, from cache when fresh
    ///
    /// # Errors
    ///
    /// Propagates fetch failures from the underlying port.
    pub async fn get(&self, policy_id: PolicyId) -> Result<Option<PolicySnapshot>, PortError> {
        {
            let cache = self.cache.lock().await;
            if let Some(snapshot) = cache.get(&policy_id) {
                if !snapshot.is_stale(self.ttl, Utc::now()) {
                    return Ok(Some(snapshot.clone()));
                }
            }
        }

        // Lock released across the fetch; a concurrent refetch of the
        // same policy is harmless.
        match self.inner.get_policy(policy_id).await? {
            Some(snapshot) => {
                self.cache.lock().await.insert(policy_id, snapshot.clone());
                Ok(Some(snapshot))
            }
            None => {
                self.cache.lock().await.remove(&policy_id);
                Ok(None)
            }
        }
    }
}

/// Policy port backed by an in-process map
///
/// Reference implementation for deployments without a separate policy
/// service; policies are seeded at startup.
#[derive(Default)]
pub struct InMemoryPolicyPort {
    policies: Mutex<HashMap<PolicyId, PolicySnapshot>>,
}

impl InMemoryPolicyPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, snapshot: PolicySnapshot) {
        self.policies.lock().await.insert(snapshot.id, snapshot);
    }
}

#[async_trait]
impl PolicyPort for InMemoryPolicyPort {
    async fn get_policy(&self, policy_id: PolicyId) -> Result<Option<PolicySnapshot>, PortError> {
        Ok(self.policies.lock().await.get(&policy_id).cloned())
    }
}
