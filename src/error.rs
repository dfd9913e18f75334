//! Error types returned by the register transport and the shared resource pool.

use core::fmt;

use crate::resource::{FeatureId, SharedResourceId};

/// Errors raised by register accesses. `E` is the error type of the underlying
/// [`Transport`](crate::transport::Transport).
#[derive(Debug, PartialEq)]
pub enum Error<E> {
    /// A channel index, register address or configuration value was out of range. Raised before
    /// any bus traffic.
    InvalidArgument,
    /// The bus transfer itself failed. The register state on the device is unknown.
    Transport(E),
    /// The frame was exchanged but its CRC5 did not match, so the data can't be trusted.
    Crc,
}

impl<E> Error<E> {
    pub(crate) fn from_transport(e: E) -> Self {
        Error::Transport(e)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::Transport(e) => write!(f, "transport failure: {:?}", e),
            Error::Crc => write!(f, "CRC mismatch on received frame"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

/// Errors raised by the shared resource pool.
///
/// Refusals (`ResourceInUse`, `SemaphoreExhausted`) are ordinary outcomes of arbitration; the
/// caller is expected to abandon the feature setup that needed the resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// Unknown resource type, resource value, resource ID or feature ID, or an attempt to act on
    /// behalf of [`FeatureId::Unused`].
    InvalidParameter,
    /// The resource is owned by a different feature.
    ResourceInUse {
        resource: SharedResourceId,
        owner: FeatureId,
    },
    /// The requesting feature already holds the resource `limit` times.
    SemaphoreExhausted {
        resource: SharedResourceId,
        limit: u8,
    },
    /// A release precondition failed: the resource is not held by the expected feature.
    NotOwned {
        resource: SharedResourceId,
        owner: FeatureId,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PoolError::InvalidParameter => write!(f, "invalid shared resource parameter"),
            PoolError::ResourceInUse { resource, owner } => {
                write!(f, "{:?} is in use by {:?}", resource, owner)
            }
            PoolError::SemaphoreExhausted { resource, limit } => {
                write!(f, "{:?} already acquired {} times", resource, limit)
            }
            PoolError::NotOwned { resource, owner } => {
                write!(f, "{:?} is held by {:?}", resource, owner)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PoolError {}
