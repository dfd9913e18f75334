//! Identifiers of the shared resources and the table mapping them from a (type, value) pair.

use core::convert::TryFrom;

use crate::error::PoolError;

/// Kinds of shared resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SharedResourceType {
    Gpio = 0,
    GpioAnalog = 1,
}

impl TryFrom<u8> for SharedResourceType {
    type Error = PoolError;

    fn try_from(raw: u8) -> Result<Self, PoolError> {
        match raw {
            0 => Ok(SharedResourceType::Gpio),
            1 => Ok(SharedResourceType::GpioAnalog),
            _ => Err(PoolError::InvalidParameter),
        }
    }
}

/// A single shared resource. The discriminant doubles as its index in the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SharedResourceId {
    Gpio00 = 0,
    Gpio01,
    Gpio02,
    Gpio03,
    Gpio04,
    Gpio05,
    Gpio06,
    Gpio07,
    Gpio08,
    Gpio09,
    Gpio10,
    Gpio11,
    Gpio12,
    Gpio13,
    Gpio14,
    Gpio15,
    Gpio16,
    Gpio17,
    Gpio18,
    GpioAna00,
    GpioAna01,
    GpioAna02,
    GpioAna03,
    GpioAna04,
    GpioAna05,
    GpioAna06,
    GpioAna07,
}

const GPIO_COUNT: u8 = 19;
const GPIO_ANALOG_COUNT: u8 = 8;

/// Number of shared resources in the pool.
pub const NUM_SHARED_RESOURCES: usize = (GPIO_COUNT + GPIO_ANALOG_COUNT) as usize;

use self::SharedResourceId::*;

const ALL_IDS: [SharedResourceId; NUM_SHARED_RESOURCES] = [
    Gpio00, Gpio01, Gpio02, Gpio03, Gpio04, Gpio05, Gpio06, Gpio07, Gpio08, Gpio09, Gpio10, Gpio11,
    Gpio12, Gpio13, Gpio14, Gpio15, Gpio16, Gpio17, Gpio18, GpioAna00, GpioAna01, GpioAna02,
    GpioAna03, GpioAna04, GpioAna05, GpioAna06, GpioAna07,
];

struct LutEntry {
    kind: SharedResourceType,
    value: u8,
    id: SharedResourceId,
}

const fn gpio(value: u8) -> LutEntry {
    LutEntry {
        kind: SharedResourceType::Gpio,
        value,
        id: ALL_IDS[value as usize],
    }
}

const fn gpio_analog(value: u8) -> LutEntry {
    LutEntry {
        kind: SharedResourceType::GpioAnalog,
        value,
        id: ALL_IDS[(GPIO_COUNT + value) as usize],
    }
}

static RESOURCE_LUT: [LutEntry; NUM_SHARED_RESOURCES] = [
    gpio(0),
    gpio(1),
    gpio(2),
    gpio(3),
    gpio(4),
    gpio(5),
    gpio(6),
    gpio(7),
    gpio(8),
    gpio(9),
    gpio(10),
    gpio(11),
    gpio(12),
    gpio(13),
    gpio(14),
    gpio(15),
    gpio(16),
    gpio(17),
    gpio(18),
    gpio_analog(0),
    gpio_analog(1),
    gpio_analog(2),
    gpio_analog(3),
    gpio_analog(4),
    gpio_analog(5),
    gpio_analog(6),
    gpio_analog(7),
];

impl SharedResourceId {
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// The resource type and value this ID stands for.
    pub fn kind_and_value(self) -> (SharedResourceType, u8) {
        let i = self as u8;
        if i < GPIO_COUNT {
            (SharedResourceType::Gpio, i)
        } else {
            (SharedResourceType::GpioAnalog, i - GPIO_COUNT)
        }
    }
}

impl From<SharedResourceId> for u8 {
    fn from(id: SharedResourceId) -> u8 {
        id as u8
    }
}

impl TryFrom<u8> for SharedResourceId {
    type Error = PoolError;

    fn try_from(raw: u8) -> Result<Self, PoolError> {
        ALL_IDS
            .get(raw as usize)
            .cloned()
            .ok_or(PoolError::InvalidParameter)
    }
}

/// Look up the ID of resource `value` of type `kind`, e.g. GPIO 6 is `Gpio06`.
pub fn resource_id_get(
    kind: SharedResourceType,
    value: u8,
) -> Result<SharedResourceId, PoolError> {
    RESOURCE_LUT
        .iter()
        .find(|entry| entry.kind == kind && entry.value == value)
        .map(|entry| entry.id)
        .ok_or(PoolError::InvalidParameter)
}

#[cfg(test)]
mod tests {
    use super::SharedResourceId::*;
    use super::*;

    #[test]
    fn lut_is_consistent() {
        for (i, entry) in RESOURCE_LUT.iter().enumerate() {
            assert_eq!(entry.id.index(), i);
            assert_eq!(entry.id.kind_and_value(), (entry.kind, entry.value));
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(resource_id_get(SharedResourceType::Gpio, 0), Ok(Gpio00));
        assert_eq!(resource_id_get(SharedResourceType::Gpio, 18), Ok(Gpio18));
        assert_eq!(resource_id_get(SharedResourceType::GpioAnalog, 0), Ok(GpioAna00));
        assert_eq!(resource_id_get(SharedResourceType::GpioAnalog, 7), Ok(GpioAna07));
        assert_eq!(u8::from(GpioAna07), 26);
    }

    #[test]
    fn lookup_out_of_range() {
        assert_eq!(
            resource_id_get(SharedResourceType::Gpio, GPIO_COUNT),
            Err(PoolError::InvalidParameter)
        );
        assert_eq!(
            resource_id_get(SharedResourceType::GpioAnalog, GPIO_ANALOG_COUNT),
            Err(PoolError::InvalidParameter)
        );
    }

    #[test]
    fn raw_conversions() {
        assert_eq!(SharedResourceType::try_from(1), Ok(SharedResourceType::GpioAnalog));
        assert_eq!(SharedResourceType::try_from(2), Err(PoolError::InvalidParameter));
        assert_eq!(SharedResourceId::try_from(19), Ok(GpioAna00));
        assert_eq!(SharedResourceId::try_from(27), Err(PoolError::InvalidParameter));
    }
}
