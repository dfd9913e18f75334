//! Register frames over a [`Transport`].
//!
//! Every access is one frame of `[control][data]`, followed by a CRC5 byte when CRC is enabled.
//! The control byte packs the chip address, the register address and the read/write bit:
//!
//! ```text
//!  7   6   5   4   3   2   1   0
//! [ chip ][     register      ][rw]
//! ```

use core::cell::Cell;
use core::marker::PhantomData;

use log::{trace, warn};

use crate::crc::{crc5, Direction};
use crate::error::Error;
use crate::registers::{field_prep, RegisterAddress, CHIP_ADDR_MASK, REG_ADDR_MASK, RW_MASK};
use crate::transport::Transport;

/// Length of a frame without CRC.
pub const FRAME_SIZE: usize = 2;
/// Length of the scratch buffer, large enough for a frame with CRC.
pub const MAX_FRAME_SIZE: usize = FRAME_SIZE + 1;

/// Encodes register accesses into frames and exchanges them over the owned transport.
///
/// The interface is `!Sync`: a read-modify-write through [`update_register`] is not
/// protected against a concurrent transfer on the same bus, so all access has to go through one
/// exclusive borrow.
///
/// [`update_register`]: FramedInterface::update_register
pub struct FramedInterface<T: Transport> {
    transport: T,
    chip_address: u8,
    crc_enabled: bool,
    buf: [u8; MAX_FRAME_SIZE],
    _single_owner: PhantomData<Cell<()>>,
}

impl<T: Transport> FramedInterface<T> {
    /// `chip_address` must already be validated to fit in the two-bit chip field.
    pub(crate) fn new(transport: T, chip_address: u8, crc_enabled: bool) -> Self {
        Self {
            transport,
            chip_address,
            crc_enabled,
            buf: [0; MAX_FRAME_SIZE],
            _single_owner: PhantomData,
        }
    }

    pub(crate) fn release(self) -> T {
        self.transport
    }

    pub(crate) fn crc_enabled(&self) -> bool {
        self.crc_enabled
    }

    fn frame_len(&self) -> usize {
        if self.crc_enabled {
            MAX_FRAME_SIZE
        } else {
            FRAME_SIZE
        }
    }

    fn control_byte(&self, addr: RegisterAddress, write: bool) -> u8 {
        field_prep(CHIP_ADDR_MASK, self.chip_address)
            | field_prep(REG_ADDR_MASK, addr.into())
            | field_prep(RW_MASK, write as u8)
    }

    /// Fill the scratch buffer with a request frame and exchange it.
    fn exchange(
        &mut self,
        addr: RegisterAddress,
        write: bool,
        value: u8,
    ) -> Result<(), Error<T::Error>> {
        let len = self.frame_len();
        self.buf = [0; MAX_FRAME_SIZE];
        self.buf[0] = self.control_byte(addr, write);
        self.buf[1] = value;
        if self.crc_enabled {
            self.buf[2] = crc5(self.buf[0], self.buf[1], Direction::Encode);
        }
        trace!("tx frame {:02x?}", &self.buf[..len]);
        self.transport
            .transfer(&mut self.buf[..len])
            .map_err(Error::from_transport)
    }

    /// Write `value` into the register at `addr`. The response is not interpreted.
    pub fn write_register(
        &mut self,
        addr: RegisterAddress,
        value: u8,
    ) -> Result<(), Error<T::Error>> {
        self.exchange(addr, true, value)
    }

    /// Read the register at `addr`. With CRC enabled, a response whose checksum doesn't match
    /// fails with [`Error::Crc`].
    pub fn read_register(&mut self, addr: RegisterAddress) -> Result<u8, Error<T::Error>> {
        self.exchange(addr, false, 0)?;
        if self.crc_enabled {
            let expected = crc5(self.buf[0], self.buf[1], Direction::Decode);
            if expected != self.buf[2] {
                warn!(
                    "crc mismatch reading {:#04x}: got {:#04x}, expected {:#04x}",
                    u8::from(addr),
                    self.buf[2],
                    expected
                );
                return Err(Error::Crc);
            }
        }
        Ok(self.buf[1])
    }

    /// Read-modify-write: the bits of `mask` take the value of the same bits in `value`, all
    /// other bits keep their current value. The register is written back even if unchanged.
    pub fn update_register(
        &mut self,
        addr: RegisterAddress,
        mask: u8,
        value: u8,
    ) -> Result<(), Error<T::Error>> {
        let current = self.read_register(addr)?;
        self.write_register(addr, (current & !mask) | (value & mask))
    }
}
