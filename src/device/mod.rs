//! The MAX22196 octal industrial digital input driver.

use log::debug;

use crate::config::{
    ChannelConfig, ChannelConfigurator, ChannelSettings, DeviceConfig, Fault, FaultStatus,
    FilterDelay, GlobalConfig, GlobalFlag, InputMode, Variant,
};
use crate::error::Error;
use crate::interface::FramedInterface;
use crate::registers::{
    field_prep, Register, RegisterAddress, CFG_DELAY_MASK, CFG_FLTEN_MASK, CFG_SOURCE_MASK,
    MAX_CHIP_ADDRESS,
};
use crate::transport::Transport;

mod counter;

/// A MAX22196 (or MAX22194) on some transport.
///
/// Every per-channel operation checks the channel against the configured channel count before the
/// transport is touched, and fails with [`Error::InvalidArgument`] if it is out of range.
pub struct Max22196<T: Transport> {
    iface: FramedInterface<T>,
    variant: Variant,
    channels: u8,
}

impl<T: Transport> Max22196<T> {
    /// Wrap `transport` without talking to the device. Fails if the chip address or channel
    /// count in `config` doesn't fit the part.
    pub fn new(transport: T, config: DeviceConfig) -> Result<Self, Error<T::Error>> {
        if config.chip_address > MAX_CHIP_ADDRESS
            || config.channels == 0
            || config.channels > config.variant.channels()
        {
            return Err(Error::InvalidArgument);
        }
        Ok(Self {
            iface: FramedInterface::new(transport, config.chip_address, config.crc_enabled),
            variant: config.variant,
            channels: config.channels,
        })
    }

    /// Like [`new`](Self::new), then read both fault registers so that faults latched during
    /// power-up are cleared.
    pub fn init(transport: T, config: DeviceConfig) -> Result<Self, Error<T::Error>> {
        let mut dev = Self::new(transport, config)?;
        let faults = dev.read_faults()?;
        if !faults.is_clear() {
            debug!("cleared faults at init: {:?}", faults);
        }
        Ok(dev)
    }

    /// Tear down the driver and give back the transport.
    pub fn remove(self) -> T {
        self.iface.release()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn crc_enabled(&self) -> bool {
        self.iface.crc_enabled()
    }

    pub(crate) fn check_channel(&self, ch: u8) -> Result<(), Error<T::Error>> {
        if ch < self.channels {
            Ok(())
        } else {
            Err(Error::InvalidArgument)
        }
    }

    fn raw_address(addr: u8) -> Result<RegisterAddress, Error<T::Error>> {
        RegisterAddress::new(addr).ok_or(Error::InvalidArgument)
    }

    pub(crate) fn read(&mut self, reg: Register) -> Result<u8, Error<T::Error>> {
        self.iface.read_register(reg.into())
    }

    pub(crate) fn write(&mut self, reg: Register, value: u8) -> Result<(), Error<T::Error>> {
        self.iface.write_register(reg.into(), value)
    }

    pub(crate) fn update(
        &mut self,
        reg: Register,
        mask: u8,
        value: u8,
    ) -> Result<(), Error<T::Error>> {
        self.iface.update_register(reg.into(), mask, value)
    }

    /// Read a register by raw address.
    pub fn reg_read(&mut self, addr: u8) -> Result<u8, Error<T::Error>> {
        let addr = Self::raw_address(addr)?;
        self.iface.read_register(addr)
    }

    /// Write a register by raw address.
    pub fn reg_write(&mut self, addr: u8, value: u8) -> Result<(), Error<T::Error>> {
        let addr = Self::raw_address(addr)?;
        self.iface.write_register(addr, value)
    }

    /// Read-modify-write a register by raw address. Only the bits in `mask` are changed.
    pub fn reg_update(&mut self, addr: u8, mask: u8, value: u8) -> Result<(), Error<T::Error>> {
        let addr = Self::raw_address(addr)?;
        self.iface.update_register(addr, mask, value)
    }

    /// Live state of all inputs, bit `ch` for channel `ch`.
    pub fn di_state(&mut self) -> Result<u8, Error<T::Error>> {
        self.read(Register::DiState)
    }

    /// Live state of a single input.
    pub fn channel_state(&mut self, ch: u8) -> Result<bool, Error<T::Error>> {
        self.check_channel(ch)?;
        Ok(self.di_state()? & (1 << ch) != 0)
    }

    pub fn set_mode(&mut self, ch: u8, mode: InputMode) -> Result<(), Error<T::Error>> {
        self.check_channel(ch)?;
        self.update(
            Register::ChannelConfig(ch),
            CFG_SOURCE_MASK,
            field_prep(CFG_SOURCE_MASK, mode.into()),
        )
    }

    /// Set threshold, mode and current of a channel at once. The filter fields are left alone.
    pub fn chan_cfg(&mut self, ch: u8, cfg: ChannelConfig) -> Result<(), Error<T::Error>> {
        self.check_channel(ch)?;
        self.update(Register::ChannelConfig(ch), ChannelConfig::MASK, cfg.into())
    }

    pub fn filter_set(
        &mut self,
        ch: u8,
        enable: bool,
        delay: FilterDelay,
    ) -> Result<(), Error<T::Error>> {
        self.check_channel(ch)?;
        self.update(
            Register::ChannelConfig(ch),
            CFG_FLTEN_MASK | CFG_DELAY_MASK,
            field_prep(CFG_FLTEN_MASK, enable as u8) | field_prep(CFG_DELAY_MASK, delay.into()),
        )
    }

    pub fn read_channel_config(&mut self, ch: u8) -> Result<ChannelSettings, Error<T::Error>> {
        self.check_channel(ch)?;
        self.read(Register::ChannelConfig(ch)).map(ChannelSettings::from)
    }

    /// Start building a change to the configuration of channel `ch`. The channel is checked when
    /// the change is committed.
    pub fn configure_channel(&mut self, ch: u8) -> ChannelConfigurator<'_, T> {
        ChannelConfigurator::new(self, ch)
    }

    /// Enable or disable reporting of `fault`.
    pub fn fault_mask_set(&mut self, fault: Fault, enable: bool) -> Result<(), Error<T::Error>> {
        let (reg, bit) = fault.mask_location();
        self.update(reg, bit, if enable { bit } else { 0 })
    }

    pub fn fault_mask_get(&mut self, fault: Fault) -> Result<bool, Error<T::Error>> {
        let (reg, bit) = fault.mask_location();
        Ok(self.read(reg)? & bit != 0)
    }

    /// Read and thereby clear both fault registers.
    pub fn read_faults(&mut self) -> Result<FaultStatus, Error<T::Error>> {
        let fault1 = self.read(Register::Fault1)?;
        let fault2 = self.read(Register::Fault2)?;
        Ok(FaultStatus { fault1, fault2 })
    }

    /// Set or clear one flag of the global configuration. All other bits keep their value.
    pub fn global_cfg_set(
        &mut self,
        flag: GlobalFlag,
        enable: bool,
    ) -> Result<(), Error<T::Error>> {
        let bit = flag.bit();
        self.update(Register::GlobalConfig, bit, if enable { bit } else { 0 })
    }

    /// Apply every flag of `cfg` at once. The reserved top bits keep their value.
    pub fn global_cfg(&mut self, cfg: GlobalConfig) -> Result<(), Error<T::Error>> {
        self.update(Register::GlobalConfig, GlobalConfig::MASK, cfg.into())
    }

    /// Switch the LED of channel `ch`. Only has an effect with `GlobalConfig::led_internal` set.
    pub fn set_led(&mut self, ch: u8, on: bool) -> Result<(), Error<T::Error>> {
        self.check_channel(ch)?;
        let bit = 1 << ch;
        self.update(Register::Led, bit, if on { bit } else { 0 })
    }
}
