//! Shims between `embedded-hal` bus implementations and the register frame layer.
//!
//! The frame layer only needs one primitive: shift a fixed number of bytes out while shifting the
//! same number in, then release chip select.

/// A full-duplex byte transport.
pub trait Transport {
    /// The type of error that a transfer may return.
    type Error;
    /// Shift `buf` out to the device and overwrite it with the bytes shifted in. Chip select is
    /// asserted for the duration of the exchange and released when it completes.
    fn transfer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

// This is here (and has to be pub) for doctests only. It's useless otherwise.
#[doc(hidden)]
pub mod noop {
    use super::Transport;
    pub struct NoopTransport;
    impl Transport for NoopTransport {
        type Error = core::convert::Infallible;
        fn transfer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
            for b in buf.iter_mut() {
                *b = 0;
            }
            Ok(())
        }
    }
}

pub mod spi {
    //! 4-wire SPI (SCK, MOSI, MISO, CS) transport.

    use embedded_hal as hal;

    use super::Transport;

    /// The union of all errors that may occur on the SPI transport.
    #[derive(Debug, PartialEq)]
    pub enum SpiTransportError<CSE, TE> {
        /// The chip select GPIO threw an error.
        ChipSelect(CSE),
        /// An error occurred during the SPI transfer.
        Transfer(TE),
    }

    impl<CSE, TE> SpiTransportError<CSE, TE> {
        fn from_cs(e: CSE) -> Self {
            Self::ChipSelect(e)
        }
        fn from_transfer(e: TE) -> Self {
            Self::Transfer(e)
        }
    }

    /// A `Transport` driving a device through an SPI master and a dedicated chip select pin.
    pub struct SpiTransport<SPI, CS> {
        spi: SPI,
        cs: CS,
    }

    impl<SPI, CS> SpiTransport<SPI, CS>
    where
        SPI: hal::blocking::spi::Transfer<u8>,
        CS: hal::digital::v2::OutputPin,
    {
        /// `spi` is the SPI master, `cs` the GPIO output wired to the device's chip select.
        pub fn new(spi: SPI, cs: CS) -> Self {
            Self { spi, cs }
        }

        /// Give back the bus and pin this transport was built from.
        pub fn release(self) -> (SPI, CS) {
            (self.spi, self.cs)
        }
    }

    impl<SPI, CS> Transport for SpiTransport<SPI, CS>
    where
        SPI: hal::blocking::spi::Transfer<u8>,
        CS: hal::digital::v2::OutputPin,
    {
        type Error = SpiTransportError<
            <CS as hal::digital::v2::OutputPin>::Error,
            <SPI as hal::blocking::spi::Transfer<u8>>::Error,
        >;

        fn transfer(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
            self.cs.set_low().map_err(Self::Error::from_cs)?;
            let result = self.spi.transfer(buf).map(|_| ());
            // Release CS even when the transfer failed, so the next frame starts clean.
            self.cs.set_high().map_err(Self::Error::from_cs)?;
            result.map_err(Self::Error::from_transfer)
        }
    }

}
