//! Shared plumbing for bare-metal peripheral drivers: a framed SPI register transport, shown here
//! driving the Maxim MAX22196 octal digital input, and a shared resource pool that arbitrates
//! GPIO ownership between the features of a transceiver such as the ADRV9025.
//!
//! The drivers are intended to work on embedded platforms using any implementation of the
//! `embedded-hal` trait library.
//!
//! # Construction
//!
//! To set up the MAX22196 driver:
//!
//! - Use your platform's `embedded-hal` implementation to obtain an SPI master device and one GPIO
//!   push-pull output pin for chip select.
//! - Construct a [`SpiTransport`], which will take ownership of both.
//! - Construct a [`Max22196`] from the transport and a [`DeviceConfig`]. `init` also clears any
//!   faults latched at power-up.
//!
//! ```ignore
//! let spi = /* construct something implementing embedded_hal::blocking::spi::Transfer<u8> */
//! let cs = /* construct something implementing embedded_hal::digital::v2::OutputPin */
//!
//! let transport = no_os_core::SpiTransport::new(spi, cs);
//! let config = no_os_core::DeviceConfig { crc_enabled: true, ..Default::default() };
//! let mut di = no_os_core::Max22196::init(transport, config)?;
//! ```
//!
//! # Frames
//!
//! Every register access is one chip select cycle of two bytes, or three with CRC enabled:
//!
//! ```text
//! [ chip(2) | register(5) | write(1) ] [ data ] [ 000 | crc5 ]
//! ```
//!
//! A read response carries the register value in the data byte. With CRC enabled the response
//! checksum is verified, and a mismatch is reported as [`Error::Crc`] rather than as a transport
//! failure.
//!
//! # Channel configuration
//!
//! *See [`Max22196::configure_channel`] and [`ChannelConfigurator`].*
//!
//! ```
//! # use no_os_core::transport::noop::NoopTransport;
//! # use no_os_core::{CurrentSetting, DeviceConfig, FilterDelay, InputMode, Max22196};
//! # fn main() -> Result<(), no_os_core::Error<core::convert::Infallible>> {
//! let mut di = Max22196::new(NoopTransport, DeviceConfig::default())?;
//! di.configure_channel(0)
//!     .mode(InputMode::Sink)
//!     .current(CurrentSetting::ThreeX)
//!     .filter(true)
//!     .delay(FilterDelay::Us1800)
//!     .commit()?;
//! let on: bool = di.channel_state(0)?;
//! di.set_chan_cnt(0, 0)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Shared resources
//!
//! *See [`ResourcePool`].*
//!
//! A feature takes every GPIO it needs before configuring it, and gives them back when it is torn
//! down. Refusals are ordinary results, not faults.
//!
//! ```
//! # use no_os_core::resource::{FeatureId, ResourcePool, SharedResourceType};
//! # fn main() -> Result<(), no_os_core::PoolError> {
//! let mut pool = ResourcePool::new();
//! pool.acquire_many(SharedResourceType::Gpio, &[2, 3], FeatureId::RxGainCtrlPin)?;
//! assert!(pool.claim_overload_pins().is_ok());
//! pool.release_many(SharedResourceType::Gpio, &[2, 3], FeatureId::RxGainCtrlPin)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Mutual exclusion
//!
//! When the pool is used from interrupt handlers as well as the main loop, wrap it with
//! [`ResourcePool::into_shared`], parameterized over a type implementing [`SharedMutex`].
//!
//! In a `std` environment you may enable the `std` Cargo feature, and `mutex::DefaultMutex<T>`
//! will be a type alias to `std::sync::Mutex<T>`. Similarly, for Cortex-M environments using the
//! `cortex-m` crate, enabling the `cortexm` Cargo feature will alias `mutex::DefaultMutex<T>` to
//! `cortex_m::interrupt::Mutex<core::cell::RefCell<T>>`.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod config;
pub mod crc;
pub mod device;
pub mod error;
pub mod interface;
pub mod mutex;
pub mod registers;
pub mod resource;
pub mod transport;

pub use crate::config::{
    ChannelConfig, ChannelConfigurator, ChannelSettings, CurrentSetting, DeviceConfig, Fault,
    FaultStatus, FilterDelay, GlobalConfig, GlobalFlag, InputMode, Variant,
};
pub use crate::device::Max22196;
pub use crate::error::{Error, PoolError};
#[cfg(any(feature = "std", feature = "cortexm"))]
pub use crate::mutex::DefaultMutex;
pub use crate::mutex::SharedMutex;
pub use crate::resource::{
    FeatureId, ResourcePool, SharedResourceId, SharedResourcePool, SharedResourceType,
};
pub use crate::transport::spi::SpiTransport;
pub use crate::transport::Transport;
