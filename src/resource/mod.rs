//! Arbitration of shared pins between device features.
//!
//! Every shared resource has one pool entry holding its owner and a semaphore count. A feature
//! that finds a resource unused claims it. A feature that already owns it may take it again, up
//! to its semaphore ceiling. Any other feature is refused. Requests never block.

use core::convert::TryFrom;

use log::debug;

use crate::error::PoolError;
use crate::mutex::SharedMutex;

mod feature;
mod id;
mod overload;
mod shared;

pub use self::feature::{max_semaphore_count_get, FeatureId};
pub use self::id::{resource_id_get, SharedResourceId, SharedResourceType, NUM_SHARED_RESOURCES};
pub use self::overload::OVERLOAD_PINS;
pub use self::shared::SharedResourcePool;

/// Ownership state of one shared resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolEntry {
    pub feature: FeatureId,
    pub semaphore_count: u8,
    /// Channels the resource serves, one bit per channel. Only written by
    /// [`ResourcePool::channel_mask_set`] and cleared by a pool reset.
    pub channel_mask: u32,
}

impl PoolEntry {
    const UNUSED: PoolEntry = PoolEntry {
        feature: FeatureId::Unused,
        semaphore_count: 0,
        channel_mask: 0,
    };
}

/// The shared resource pool of one device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourcePool {
    entries: [PoolEntry; NUM_SHARED_RESOURCES],
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourcePool {
    /// A pool with every resource unused.
    pub fn new() -> Self {
        Self {
            entries: [PoolEntry::UNUSED; NUM_SHARED_RESOURCES],
        }
    }

    /// Return every resource to the unused state.
    pub fn reset_pool(&mut self) {
        self.entries = [PoolEntry::UNUSED; NUM_SHARED_RESOURCES];
    }

    /// Wrap the pool in a mutex so it can be shared with interrupt handlers or other threads.
    ///
    /// ```
    /// # use no_os_core::resource::{ResourcePool, FeatureId, SharedResourceId};
    /// # use no_os_core::mutex::DefaultMutex;
    /// let pool = ResourcePool::new().into_shared::<DefaultMutex<_>>();
    /// pool.acquire(SharedResourceId::Gpio03, FeatureId::ArmGpioPin).unwrap();
    /// assert!(!pool.availability_check(SharedResourceId::Gpio03));
    /// ```
    pub fn into_shared<M: SharedMutex<ResourcePool>>(self) -> SharedResourcePool<M> {
        SharedResourcePool::new(self)
    }

    pub fn entry(&self, id: SharedResourceId) -> PoolEntry {
        self.entries[id.index()]
    }

    /// Whether nobody owns `id`.
    pub fn availability_check(&self, id: SharedResourceId) -> bool {
        self.entry(id).feature == FeatureId::Unused
    }

    /// Current owner of `id`, [`FeatureId::Unused`] if none.
    pub fn feature_get(&self, id: SharedResourceId) -> FeatureId {
        self.entry(id).feature
    }

    pub fn semaphore_count(&self, id: SharedResourceId) -> u8 {
        self.entry(id).semaphore_count
    }

    /// Record which channels `id` serves. Ownership is not checked and the mask is kept across
    /// acquire and release.
    pub fn channel_mask_set(&mut self, id: SharedResourceId, mask: u32) {
        self.entries[id.index()].channel_mask = mask;
    }

    pub fn channel_mask_get(&self, id: SharedResourceId) -> u32 {
        self.entry(id).channel_mask
    }

    /// Take `id` on behalf of `feature`.
    ///
    /// An unused resource is claimed with a count of one. A resource already owned by `feature`
    /// has its count raised, unless that would pass the feature's ceiling. A resource owned by
    /// another feature is refused.
    pub fn acquire(&mut self, id: SharedResourceId, feature: FeatureId) -> Result<(), PoolError> {
        if feature == FeatureId::Unused {
            return Err(PoolError::InvalidParameter);
        }
        let entry = &mut self.entries[id.index()];
        if entry.feature == FeatureId::Unused {
            entry.feature = feature;
            entry.semaphore_count = 1;
        } else if entry.feature != feature {
            debug!("{:?} refused {:?}, owned by {:?}", feature, id, entry.feature);
            return Err(PoolError::ResourceInUse {
                resource: id,
                owner: entry.feature,
            });
        } else {
            let limit = feature.max_semaphore_count();
            if entry.semaphore_count >= limit {
                debug!("{:?} refused {:?}, already held {} times", feature, id, limit);
                return Err(PoolError::SemaphoreExhausted {
                    resource: id,
                    limit,
                });
            }
            entry.semaphore_count += 1;
        }
        debug!("{:?} acquired {:?} ({})", feature, id, entry.semaphore_count);
        Ok(())
    }

    /// Give back one hold of `id` by `feature`. The resource becomes unused when the last hold is
    /// released.
    ///
    /// Releasing a resource that is unused, or owned by a different feature, succeeds and
    /// changes nothing.
    pub fn release(&mut self, id: SharedResourceId, feature: FeatureId) -> Result<(), PoolError> {
        if feature == FeatureId::Unused {
            return Err(PoolError::InvalidParameter);
        }
        let entry = &mut self.entries[id.index()];
        if entry.feature != feature {
            if entry.feature != FeatureId::Unused {
                debug!("{:?} released {:?} owned by {:?}, ignored", feature, id, entry.feature);
            }
            return Ok(());
        }
        entry.semaphore_count = entry.semaphore_count.saturating_sub(1);
        if entry.semaphore_count == 0 {
            entry.feature = FeatureId::Unused;
        }
        debug!("{:?} released {:?} ({})", feature, id, entry.semaphore_count);
        Ok(())
    }

    /// Acquire each of `values` of type `kind`, in order. Stops at the first failure; resources
    /// acquired before it stay acquired.
    pub fn acquire_many(
        &mut self,
        kind: SharedResourceType,
        values: &[u8],
        feature: FeatureId,
    ) -> Result<(), PoolError> {
        for &value in values {
            let id = resource_id_get(kind, value)?;
            self.acquire(id, feature)?;
        }
        Ok(())
    }

    /// Release each of `values` of type `kind`, in order. Stops at the first failure.
    pub fn release_many(
        &mut self,
        kind: SharedResourceType,
        values: &[u8],
        feature: FeatureId,
    ) -> Result<(), PoolError> {
        for &value in values {
            let id = resource_id_get(kind, value)?;
            self.release(id, feature)?;
        }
        Ok(())
    }

    /// Like [`acquire_many`](Self::acquire_many), but on failure the pool is put back the way it
    /// was before the call.
    pub fn acquire_many_atomic(
        &mut self,
        kind: SharedResourceType,
        values: &[u8],
        feature: FeatureId,
    ) -> Result<(), PoolError> {
        let snapshot = self.entries;
        let result = self.acquire_many(kind, values, feature);
        if result.is_err() {
            self.entries = snapshot;
        }
        result
    }

    /// Raw-value front end to [`acquire`](Self::acquire), for callers holding integer IDs.
    pub fn acquire_raw(&mut self, id: u8, feature: u8) -> Result<(), PoolError> {
        self.acquire(SharedResourceId::try_from(id)?, FeatureId::try_from(feature)?)
    }

    /// Raw-value front end to [`release`](Self::release).
    pub fn release_raw(&mut self, id: u8, feature: u8) -> Result<(), PoolError> {
        self.release(SharedResourceId::try_from(id)?, FeatureId::try_from(feature)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GPIO: SharedResourceType = SharedResourceType::Gpio;

    fn all_unused(pool: &ResourcePool) -> bool {
        pool.entries.iter().all(|e| *e == PoolEntry::UNUSED)
    }

    fn any_feature() -> impl Strategy<Value = FeatureId> {
        (1u8..=17).prop_map(|raw| FeatureId::try_from(raw).unwrap())
    }

    fn any_resource() -> impl Strategy<Value = SharedResourceId> {
        (0u8..27).prop_map(|raw| SharedResourceId::try_from(raw).unwrap())
    }

    #[test]
    fn new_pool_is_unused() {
        let pool = ResourcePool::new();
        assert!(all_unused(&pool));
        assert_eq!(pool, ResourcePool::default());
    }

    #[test]
    fn reset_clears_everything() {
        let mut pool = ResourcePool::new();
        pool.acquire(SharedResourceId::Gpio00, FeatureId::Pca).unwrap();
        pool.acquire(SharedResourceId::GpioAna07, FeatureId::AuxDacOut).unwrap();
        pool.reset_pool();
        assert!(all_unused(&pool));
    }

    #[test]
    fn channel_mask_round_trip() {
        let mut pool = ResourcePool::new();
        let id = SharedResourceId::Gpio14;
        assert_eq!(pool.channel_mask_get(id), 0);
        pool.channel_mask_set(id, 0x0000_00A5);
        assert_eq!(pool.channel_mask_get(id), 0x0000_00A5);
        assert_eq!(pool.channel_mask_get(SharedResourceId::Gpio13), 0);
        pool.channel_mask_set(id, 0x8000_0001);
        assert_eq!(pool.channel_mask_get(id), 0x8000_0001);
    }

    #[test]
    fn channel_mask_survives_acquire_and_release() {
        let mut pool = ResourcePool::new();
        let id = SharedResourceId::GpioAna04;
        pool.channel_mask_set(id, 0b0110);
        pool.acquire(id, FeatureId::RxPinCtrlAttn).unwrap();
        pool.acquire(id, FeatureId::RxPinCtrlAttn).unwrap();
        assert_eq!(pool.channel_mask_get(id), 0b0110);
        pool.release(id, FeatureId::RxPinCtrlAttn).unwrap();
        pool.release(id, FeatureId::RxPinCtrlAttn).unwrap();
        assert!(pool.availability_check(id));
        assert_eq!(pool.semaphore_count(id), 0);
        assert_eq!(pool.channel_mask_get(id), 0b0110);
    }

    #[test]
    fn reset_clears_channel_masks() {
        let mut pool = ResourcePool::new();
        pool.channel_mask_set(SharedResourceId::Gpio00, 0xFF);
        pool.channel_mask_set(SharedResourceId::GpioAna07, 0x1);
        pool.reset_pool();
        assert_eq!(pool.channel_mask_get(SharedResourceId::Gpio00), 0);
        assert_eq!(pool.channel_mask_get(SharedResourceId::GpioAna07), 0);
        assert!(all_unused(&pool));
    }

    #[test]
    fn acquire_claims_and_reports_owner() {
        let mut pool = ResourcePool::new();
        let id = SharedResourceId::Gpio05;
        assert!(pool.availability_check(id));
        pool.acquire(id, FeatureId::Fovr).unwrap();
        assert!(!pool.availability_check(id));
        assert_eq!(pool.feature_get(id), FeatureId::Fovr);
        assert_eq!(pool.semaphore_count(id), 1);
        assert_eq!(
            pool.entry(id),
            PoolEntry {
                feature: FeatureId::Fovr,
                semaphore_count: 1,
                channel_mask: 0,
            }
        );
    }

    #[test]
    fn unused_is_not_a_requester() {
        let mut pool = ResourcePool::new();
        let id = SharedResourceId::Gpio01;
        assert_eq!(pool.acquire(id, FeatureId::Unused), Err(PoolError::InvalidParameter));
        assert_eq!(pool.release(id, FeatureId::Unused), Err(PoolError::InvalidParameter));
        assert!(all_unused(&pool));
    }

    #[test]
    fn release_of_unused_resource_succeeds() {
        let mut pool = ResourcePool::new();
        assert_eq!(pool.release(SharedResourceId::Gpio07, FeatureId::Pca), Ok(()));
        assert!(all_unused(&pool));
    }

    #[test]
    fn release_by_other_owner_is_ignored() {
        let mut pool = ResourcePool::new();
        let id = SharedResourceId::GpioAna02;
        pool.acquire(id, FeatureId::AuxDacOut).unwrap();
        assert_eq!(pool.release(id, FeatureId::ArmGpioPin), Ok(()));
        assert_eq!(pool.feature_get(id), FeatureId::AuxDacOut);
        assert_eq!(pool.semaphore_count(id), 1);
    }

    #[test]
    fn gpio_stream_trigger_ceiling() {
        let mut pool = ResourcePool::new();
        let id = SharedResourceId::Gpio10;
        for _ in 0..11 {
            pool.acquire(id, FeatureId::GpioStreamTrigger).unwrap();
        }
        assert_eq!(
            pool.acquire(id, FeatureId::GpioStreamTrigger),
            Err(PoolError::SemaphoreExhausted {
                resource: id,
                limit: 11
            })
        );
        assert_eq!(pool.semaphore_count(id), 11);
    }

    #[test]
    fn acquire_many_stops_at_first_failure() {
        let mut pool = ResourcePool::new();
        pool.acquire(SharedResourceId::Gpio03, FeatureId::Spi2CtrlPin).unwrap();
        assert_eq!(
            pool.acquire_many(GPIO, &[1, 2, 3, 4], FeatureId::ArmGpioPin),
            Err(PoolError::ResourceInUse {
                resource: SharedResourceId::Gpio03,
                owner: FeatureId::Spi2CtrlPin
            })
        );
        assert_eq!(pool.feature_get(SharedResourceId::Gpio01), FeatureId::ArmGpioPin);
        assert_eq!(pool.feature_get(SharedResourceId::Gpio02), FeatureId::ArmGpioPin);
        assert!(pool.availability_check(SharedResourceId::Gpio04));
    }

    #[test]
    fn acquire_many_rejects_unknown_value() {
        let mut pool = ResourcePool::new();
        assert_eq!(
            pool.acquire_many(SharedResourceType::GpioAnalog, &[0, 8], FeatureId::AuxDacOut),
            Err(PoolError::InvalidParameter)
        );
        assert_eq!(pool.feature_get(SharedResourceId::GpioAna00), FeatureId::AuxDacOut);
    }

    #[test]
    fn acquire_many_atomic_rolls_back() {
        let mut pool = ResourcePool::new();
        pool.acquire(SharedResourceId::Gpio04, FeatureId::Pca).unwrap();
        let before = pool.clone();
        assert!(pool
            .acquire_many_atomic(GPIO, &[1, 2, 3, 4], FeatureId::ArmGpioPin)
            .is_err());
        assert_eq!(pool, before);
        pool.acquire_many_atomic(GPIO, &[1, 2, 3], FeatureId::ArmGpioPin).unwrap();
        assert_eq!(pool.feature_get(SharedResourceId::Gpio03), FeatureId::ArmGpioPin);
    }

    #[test]
    fn release_many_frees_in_order() {
        let mut pool = ResourcePool::new();
        pool.acquire_many(GPIO, &[8, 9], FeatureId::TxAttenCtrlPin).unwrap();
        pool.release_many(GPIO, &[8, 9], FeatureId::TxAttenCtrlPin).unwrap();
        assert!(all_unused(&pool));
        assert_eq!(
            pool.release_many(GPIO, &[19], FeatureId::TxAttenCtrlPin),
            Err(PoolError::InvalidParameter)
        );
    }

    #[test]
    fn raw_front_end() {
        let mut pool = ResourcePool::new();
        pool.acquire_raw(20, 10).unwrap();
        assert_eq!(pool.feature_get(SharedResourceId::GpioAna01), FeatureId::AuxDacOut);
        assert_eq!(pool.acquire_raw(27, 10), Err(PoolError::InvalidParameter));
        assert_eq!(pool.acquire_raw(0, 18), Err(PoolError::InvalidParameter));
        pool.release_raw(20, 10).unwrap();
        assert!(all_unused(&pool));
    }

    proptest! {
        #[test]
        fn acquire_release_symmetry(
            id in any_resource(),
            feature in any_feature(),
            k in 1u8..=11,
        ) {
            let mut pool = ResourcePool::new();
            let k = k.min(feature.max_semaphore_count());
            for _ in 0..k {
                prop_assert!(pool.acquire(id, feature).is_ok());
            }
            prop_assert_eq!(pool.semaphore_count(id), k);
            for _ in 0..k {
                prop_assert!(pool.release(id, feature).is_ok());
            }
            prop_assert!(all_unused(&pool));
        }

        #[test]
        fn semaphore_ceiling_holds(id in any_resource(), feature in any_feature()) {
            let mut pool = ResourcePool::new();
            let limit = feature.max_semaphore_count();
            for _ in 0..limit {
                prop_assert!(pool.acquire(id, feature).is_ok());
            }
            prop_assert_eq!(
                pool.acquire(id, feature),
                Err(PoolError::SemaphoreExhausted { resource: id, limit })
            );
            prop_assert_eq!(pool.semaphore_count(id), limit);
        }

        #[test]
        fn other_features_are_excluded(
            id in any_resource(),
            a in any_feature(),
            b in any_feature(),
        ) {
            prop_assume!(a != b);
            let mut pool = ResourcePool::new();
            pool.acquire(id, a).unwrap();
            prop_assert_eq!(
                pool.acquire(id, b),
                Err(PoolError::ResourceInUse { resource: id, owner: a })
            );
            prop_assert!(pool.release(id, b).is_ok());
            prop_assert_eq!(pool.feature_get(id), a);
            prop_assert_eq!(pool.semaphore_count(id), 1);
        }
    }
}
