//! GPIO claim for the AGC ADC overload indication, which drives twelve GPIOs as status outputs.

use log::debug;

use super::{resource_id_get, FeatureId, ResourcePool, SharedResourceId, SharedResourceType};
use crate::error::PoolError;

/// The GPIOs that carry the overload indication.
pub const OVERLOAD_PINS: [u8; 12] = [6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17];

const FEATURE: FeatureId = FeatureId::AdcOverloadIndication;

fn overload_ids() -> impl Iterator<Item = Result<SharedResourceId, PoolError>> {
    OVERLOAD_PINS
        .iter()
        .map(|&pin| resource_id_get(SharedResourceType::Gpio, pin))
}

impl ResourcePool {
    /// Claim all overload indication GPIOs. Refused without touching the pool unless every one
    /// of them is unused.
    pub fn claim_overload_pins(&mut self) -> Result<(), PoolError> {
        for id in overload_ids() {
            let id = id?;
            let owner = self.feature_get(id);
            if owner != FeatureId::Unused {
                debug!("overload indication blocked: {:?} held by {:?}", id, owner);
                return Err(PoolError::ResourceInUse {
                    resource: id,
                    owner,
                });
            }
        }
        self.acquire_many(SharedResourceType::Gpio, &OVERLOAD_PINS, FEATURE)
    }

    /// Release all overload indication GPIOs. Refused without touching the pool unless every one
    /// of them is held by the overload indication.
    pub fn release_overload_pins(&mut self) -> Result<(), PoolError> {
        for id in overload_ids() {
            let id = id?;
            let owner = self.feature_get(id);
            if owner != FEATURE {
                return Err(PoolError::NotOwned {
                    resource: id,
                    owner,
                });
            }
        }
        self.release_many(SharedResourceType::Gpio, &OVERLOAD_PINS, FEATURE)
    }
}
