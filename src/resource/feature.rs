use core::convert::TryFrom;

use crate::error::PoolError;

/// A logical capability that can own shared resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FeatureId {
    /// Marks a resource that nobody owns. Not a valid requester.
    Unused = 0,
    RxGainCtrlPin = 1,
    RxPinCtrlAttn = 2,
    RxExtCtrlWordOutput = 3,
    RxDualbandLnaCtrlWordOutput = 4,
    TxAttenCtrlPin = 5,
    Spi2CtrlPin = 6,
    RxExtSlicerCtrl = 7,
    RxIntSlicerCtrlOut = 8,
    ArmGpioPin = 9,
    AuxDacOut = 10,
    GpioStreamTrigger = 11,
    Fovr = 12,
    Pca = 13,
    TxAttenUpdatePin = 14,
    ExtDpdCaptureDonePin = 15,
    AdcOverloadIndication = 16,
    RxAgcHybridMode = 17,
}

const FEATURES: [FeatureId; 18] = [
    FeatureId::Unused,
    FeatureId::RxGainCtrlPin,
    FeatureId::RxPinCtrlAttn,
    FeatureId::RxExtCtrlWordOutput,
    FeatureId::RxDualbandLnaCtrlWordOutput,
    FeatureId::TxAttenCtrlPin,
    FeatureId::Spi2CtrlPin,
    FeatureId::RxExtSlicerCtrl,
    FeatureId::RxIntSlicerCtrlOut,
    FeatureId::ArmGpioPin,
    FeatureId::AuxDacOut,
    FeatureId::GpioStreamTrigger,
    FeatureId::Fovr,
    FeatureId::Pca,
    FeatureId::TxAttenUpdatePin,
    FeatureId::ExtDpdCaptureDonePin,
    FeatureId::AdcOverloadIndication,
    FeatureId::RxAgcHybridMode,
];

/// Ceiling for features that share a pin between several of their own users.
const PIN_CONTROL_SEMAPHORE_COUNT: u8 = 4;
const GPIO_STREAM_TRIGGER_SEMAPHORE_COUNT: u8 = 11;

impl FeatureId {
    /// How many times this feature may hold the same resource at once.
    pub fn max_semaphore_count(self) -> u8 {
        use self::FeatureId::*;
        match self {
            RxGainCtrlPin
            | RxPinCtrlAttn
            | RxExtCtrlWordOutput
            | RxDualbandLnaCtrlWordOutput
            | TxAttenCtrlPin
            | Spi2CtrlPin
            | RxExtSlicerCtrl
            | RxIntSlicerCtrlOut
            | Fovr
            | Pca
            | TxAttenUpdatePin
            | ExtDpdCaptureDonePin => PIN_CONTROL_SEMAPHORE_COUNT,
            GpioStreamTrigger => GPIO_STREAM_TRIGGER_SEMAPHORE_COUNT,
            _ => 1,
        }
    }
}

/// Semaphore ceiling of `feature`.
pub fn max_semaphore_count_get(feature: FeatureId) -> u8 {
    feature.max_semaphore_count()
}

impl From<FeatureId> for u8 {
    fn from(feature: FeatureId) -> u8 {
        feature as u8
    }
}

impl TryFrom<u8> for FeatureId {
    type Error = PoolError;

    fn try_from(raw: u8) -> Result<Self, PoolError> {
        FEATURES
            .get(raw as usize)
            .cloned()
            .ok_or(PoolError::InvalidParameter)
    }
}
