//! Pulse counters. Each channel of a MAX22196 has a 16-bit counter, gated by its bit in the
//! start/stop register. The two halves can only be accessed consistently while it is stopped, so
//! every access is bracketed by a stop and a restart.

use log::trace;

use super::Max22196;
use crate::error::Error;
use crate::registers::Register;
use crate::transport::Transport;

impl<T: Transport> Max22196<T> {
    fn check_counter(&self, ch: u8) -> Result<(), Error<T::Error>> {
        self.check_channel(ch)?;
        if self.variant.has_counter(ch) {
            Ok(())
        } else {
            Err(Error::InvalidArgument)
        }
    }

    fn gate(&mut self, ch: u8, run: bool) -> Result<(), Error<T::Error>> {
        let bit = 1 << ch;
        self.update(Register::StartStop, bit, if run { bit } else { 0 })
    }

    /// Let the counter of `ch` count.
    pub fn start_counter(&mut self, ch: u8) -> Result<(), Error<T::Error>> {
        self.check_counter(ch)?;
        self.gate(ch, true)
    }

    /// Freeze the counter of `ch`.
    pub fn stop_counter(&mut self, ch: u8) -> Result<(), Error<T::Error>> {
        self.check_counter(ch)?;
        self.gate(ch, false)
    }

    /// Load `count` into the counter of `ch` and leave it running.
    ///
    /// The counter is stopped, the high byte written, then the low byte, then the counter is
    /// restarted. A failure at any step is returned as is; the steps already done are not undone,
    /// so the counter may be left stopped.
    pub fn set_chan_cnt(&mut self, ch: u8, count: u16) -> Result<(), Error<T::Error>> {
        self.check_counter(ch)?;
        trace!("loading counter {} with {}", ch, count);
        self.gate(ch, false)?;
        self.write(Register::CounterMsb(ch), (count >> 8) as u8)?;
        self.write(Register::CounterLsb(ch), count as u8)?;
        self.gate(ch, true)
    }

    /// Read the counter of `ch` and leave it running. Sequenced like
    /// [`set_chan_cnt`](Self::set_chan_cnt), with the same lack of rollback.
    pub fn get_chan_cnt(&mut self, ch: u8) -> Result<u16, Error<T::Error>> {
        self.check_counter(ch)?;
        self.gate(ch, false)?;
        let msb = self.read(Register::CounterMsb(ch))?;
        let lsb = self.read(Register::CounterLsb(ch))?;
        self.gate(ch, true)?;
        Ok(u16::from(msb) << 8 | u16::from(lsb))
    }
}
