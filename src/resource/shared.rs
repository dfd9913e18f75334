use super::{FeatureId, ResourcePool, SharedResourceId, SharedResourceType};
use crate::error::PoolError;
use crate::mutex::SharedMutex;

/// A [`ResourcePool`] behind a mutex, so that it can be arbitrated from interrupt handlers and
/// the main loop alike. Every operation runs as one critical section.
pub struct SharedResourcePool<M> {
    pool: M,
}

impl<M: SharedMutex<ResourcePool>> SharedResourcePool<M> {
    pub(crate) fn new(pool: ResourcePool) -> Self {
        Self { pool: M::new(pool) }
    }

    /// Run `f` with exclusive access to the pool, for sequences that must not interleave with
    /// other users.
    pub fn with<R, F: FnOnce(&mut ResourcePool) -> R>(&self, f: F) -> R {
        self.pool.lock(f)
    }

    pub fn reset_pool(&self) {
        self.with(|p| p.reset_pool())
    }

    pub fn availability_check(&self, id: SharedResourceId) -> bool {
        self.with(|p| p.availability_check(id))
    }

    pub fn feature_get(&self, id: SharedResourceId) -> FeatureId {
        self.with(|p| p.feature_get(id))
    }

    pub fn semaphore_count(&self, id: SharedResourceId) -> u8 {
        self.with(|p| p.semaphore_count(id))
    }

    pub fn channel_mask_set(&self, id: SharedResourceId, mask: u32) {
        self.with(|p| p.channel_mask_set(id, mask))
    }

    pub fn channel_mask_get(&self, id: SharedResourceId) -> u32 {
        self.with(|p| p.channel_mask_get(id))
    }

    pub fn acquire(&self, id: SharedResourceId, feature: FeatureId) -> Result<(), PoolError> {
        self.with(|p| p.acquire(id, feature))
    }

    pub fn release(&self, id: SharedResourceId, feature: FeatureId) -> Result<(), PoolError> {
        self.with(|p| p.release(id, feature))
    }

    pub fn acquire_many(
        &self,
        kind: SharedResourceType,
        values: &[u8],
        feature: FeatureId,
    ) -> Result<(), PoolError> {
        self.with(|p| p.acquire_many(kind, values, feature))
    }

    pub fn release_many(
        &self,
        kind: SharedResourceType,
        values: &[u8],
        feature: FeatureId,
    ) -> Result<(), PoolError> {
        self.with(|p| p.release_many(kind, values, feature))
    }

    pub fn acquire_many_atomic(
        &self,
        kind: SharedResourceType,
        values: &[u8],
        feature: FeatureId,
    ) -> Result<(), PoolError> {
        self.with(|p| p.acquire_many_atomic(kind, values, feature))
    }

    pub fn claim_overload_pins(&self) -> Result<(), PoolError> {
        self.with(|p| p.claim_overload_pins())
    }

    pub fn release_overload_pins(&self) -> Result<(), PoolError> {
        self.with(|p| p.release_overload_pins())
    }
}
