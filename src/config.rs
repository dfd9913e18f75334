//! Abstractions used to configure the MAX22196 hardware.

use crate::device::Max22196;
use crate::error::Error;
use crate::registers::{
    field_get, field_prep, Register, CFG_CURR_MASK, CFG_DELAY_MASK, CFG_FLTEN_MASK,
    CFG_HITHR_MASK, CFG_SOURCE_MASK, MAX_CHANNELS,
};
use crate::transport::Transport;

/// The members of the device family this driver supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Octal input, with a 16-bit pulse counter on every channel.
    Max22196,
    /// Quad input, no pulse counters.
    Max22194,
}

impl Variant {
    /// Number of input channels the part has.
    pub fn channels(self) -> u8 {
        match self {
            Variant::Max22196 => MAX_CHANNELS,
            Variant::Max22194 => 4,
        }
    }

    /// Whether the pulse counter of channel `ch` exists on this part.
    pub fn has_counter(self, ch: u8) -> bool {
        match self {
            Variant::Max22196 => ch < MAX_CHANNELS,
            Variant::Max22194 => false,
        }
    }
}

/// Parameters used to bring up a device.
#[derive(Clone, Copy, Debug)]
pub struct DeviceConfig {
    /// Address of the part on a multi-drop bus, `0..=3`.
    pub chip_address: u8,
    /// Append a CRC5 byte to every frame and check it on reads.
    pub crc_enabled: bool,
    pub variant: Variant,
    /// Number of channels in use, at most `variant.channels()`.
    pub channels: u8,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            chip_address: 0,
            crc_enabled: false,
            variant: Variant::Max22196,
            channels: MAX_CHANNELS,
        }
    }
}

/// Whether a channel sources or sinks current.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Source,
    Sink,
}

impl From<InputMode> for u8 {
    fn from(mode: InputMode) -> u8 {
        match mode {
            InputMode::Source => 0,
            InputMode::Sink => 1,
        }
    }
}

impl From<u8> for InputMode {
    fn from(bits: u8) -> Self {
        if bits & 0x01 == 0 {
            InputMode::Source
        } else {
            InputMode::Sink
        }
    }
}

/// Current setting of a channel's input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurrentSetting {
    /// HTL input levels.
    Htl,
    /// Standard input current.
    OneX,
    /// Triple input current, for type 2 sensors.
    ThreeX,
    /// TTL levels with the current sink turned off.
    TtlOff,
}

impl From<CurrentSetting> for u8 {
    fn from(curr: CurrentSetting) -> u8 {
        use self::CurrentSetting::*;
        match curr {
            Htl => 0b00,
            OneX => 0b01,
            ThreeX => 0b10,
            TtlOff => 0b11,
        }
    }
}

impl From<u8> for CurrentSetting {
    fn from(bits: u8) -> Self {
        use self::CurrentSetting::*;
        match bits & 0b11 {
            0b00 => Htl,
            0b01 => OneX,
            0b10 => ThreeX,
            _ => TtlOff,
        }
    }
}

/// Glitch filter delay of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterDelay {
    Us50,
    Us100,
    Us400,
    Us800,
    Us1800,
    Us3200,
    Us12800,
    Us20000,
}

const FILTER_DELAYS: [FilterDelay; 8] = [
    FilterDelay::Us50,
    FilterDelay::Us100,
    FilterDelay::Us400,
    FilterDelay::Us800,
    FilterDelay::Us1800,
    FilterDelay::Us3200,
    FilterDelay::Us12800,
    FilterDelay::Us20000,
];

impl FilterDelay {
    /// The delay in microseconds.
    pub fn micros(self) -> u32 {
        use self::FilterDelay::*;
        match self {
            Us50 => 50,
            Us100 => 100,
            Us400 => 400,
            Us800 => 800,
            Us1800 => 1800,
            Us3200 => 3200,
            Us12800 => 12800,
            Us20000 => 20000,
        }
    }

    /// The delay setting matching exactly `us` microseconds, if the hardware has one.
    pub fn from_micros(us: u32) -> Option<Self> {
        FILTER_DELAYS.iter().cloned().find(|d| d.micros() == us)
    }
}

impl From<FilterDelay> for u8 {
    fn from(delay: FilterDelay) -> u8 {
        FILTER_DELAYS.iter().position(|&d| d == delay).unwrap_or(0) as u8
    }
}

impl From<u8> for FilterDelay {
    fn from(bits: u8) -> Self {
        FILTER_DELAYS[(bits & 0b111) as usize]
    }
}

/// Input characteristics of a channel, applied together by `Max22196::chan_cfg`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Use the high voltage threshold set.
    pub high_threshold: bool,
    pub mode: InputMode,
    pub current: CurrentSetting,
}

impl ChannelConfig {
    pub(crate) const MASK: u8 = CFG_HITHR_MASK | CFG_SOURCE_MASK | CFG_CURR_MASK;
}

impl From<ChannelConfig> for u8 {
    fn from(cfg: ChannelConfig) -> u8 {
        field_prep(CFG_HITHR_MASK, cfg.high_threshold as u8)
            | field_prep(CFG_SOURCE_MASK, cfg.mode.into())
            | field_prep(CFG_CURR_MASK, cfg.current.into())
    }
}

/// Full content of a channel configuration register, as read back from the device.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelSettings {
    pub config: ChannelConfig,
    pub filter_enabled: bool,
    pub filter_delay: FilterDelay,
}

impl From<u8> for ChannelSettings {
    fn from(reg: u8) -> Self {
        Self {
            config: ChannelConfig {
                high_threshold: field_get(CFG_HITHR_MASK, reg) != 0,
                mode: field_get(CFG_SOURCE_MASK, reg).into(),
                current: field_get(CFG_CURR_MASK, reg).into(),
            },
            filter_enabled: field_get(CFG_FLTEN_MASK, reg) != 0,
            filter_delay: field_get(CFG_DELAY_MASK, reg).into(),
        }
    }
}

/// A fault condition reported in FAULT1 or FAULT2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    /// 24 V field supply undervoltage.
    V24Undervoltage,
    /// VM supply low.
    VmLow,
    /// Die temperature alarm.
    TemperatureAlarm,
    /// Thermal shutdown, first stage.
    OverTemperature1,
    /// Summary of any unmasked FAULT2 flag.
    Fault2,
    /// REFDI resistor shorted.
    RefDiShort,
    /// REFDI resistor open.
    RefDiOpen,
    /// Thermal shutdown, second stage.
    OverTemperature2,
    /// SPI frame was not a multiple of 8 clocks.
    Spi8Clock,
    /// VA supply undervoltage.
    VaUndervoltage,
}

impl Fault {
    /// The mask register and bit controlling this fault.
    pub(crate) fn mask_location(self) -> (Register, u8) {
        use self::Fault::*;
        match self {
            V24Undervoltage => (Register::Fault1Mask, 1 << 1),
            VmLow => (Register::Fault1Mask, 1 << 2),
            TemperatureAlarm => (Register::Fault1Mask, 1 << 3),
            OverTemperature1 => (Register::Fault1Mask, 1 << 4),
            Fault2 => (Register::Fault1Mask, 1 << 5),
            RefDiShort => (Register::Fault2Mask, 1 << 0),
            RefDiOpen => (Register::Fault2Mask, 1 << 1),
            OverTemperature2 => (Register::Fault2Mask, 1 << 2),
            Spi8Clock => (Register::Fault2Mask, 1 << 3),
            VaUndervoltage => (Register::Fault2Mask, 1 << 4),
        }
    }
}

/// Snapshot of both fault registers. Reading them clears the latched flags on the device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaultStatus {
    pub fault1: u8,
    pub fault2: u8,
}

impl FaultStatus {
    pub fn contains(&self, fault: Fault) -> bool {
        match fault.mask_location() {
            (Register::Fault1Mask, bit) => self.fault1 & bit != 0,
            (_, bit) => self.fault2 & bit != 0,
        }
    }

    pub fn is_clear(&self) -> bool {
        self.fault1 == 0 && self.fault2 == 0
    }
}

/// Content of the global configuration register.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlobalConfig {
    /// Keep the inputs running when the REFDI resistor is shorted.
    pub refdi_short_ignore: bool,
    /// Clear the glitch filters of all channels.
    pub clear_filters: bool,
    /// Clear latched faults on any SPI read instead of only on fault register reads.
    pub fault_clear_on_spi: bool,
    /// Drive the ninth LED as a fault indicator.
    pub led9: bool,
    /// Drive the LEDs from the LED register instead of the input states.
    pub led_internal: bool,
    /// Level of the general purpose output.
    pub gpo: bool,
}

/// A single flag of the global configuration register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalFlag {
    RefDiShortCfg,
    ClrFiltr,
    FspiClr,
    Led9,
    LedInt,
    Gpo,
}

impl GlobalFlag {
    pub(crate) fn bit(self) -> u8 {
        use self::GlobalFlag::*;
        match self {
            Gpo => 1 << 0,
            LedInt => 1 << 1,
            Led9 => 1 << 2,
            FspiClr => 1 << 3,
            ClrFiltr => 1 << 4,
            RefDiShortCfg => 1 << 5,
        }
    }
}

impl GlobalConfig {
    /// The bits of the global configuration register covered by [`GlobalFlag`]. The two top bits
    /// are reserved.
    pub(crate) const MASK: u8 = 0b0011_1111;
}

impl From<GlobalConfig> for u8 {
    fn from(cfg: GlobalConfig) -> u8 {
        let flags = [
            (cfg.gpo, GlobalFlag::Gpo),
            (cfg.led_internal, GlobalFlag::LedInt),
            (cfg.led9, GlobalFlag::Led9),
            (cfg.fault_clear_on_spi, GlobalFlag::FspiClr),
            (cfg.clear_filters, GlobalFlag::ClrFiltr),
            (cfg.refdi_short_ignore, GlobalFlag::RefDiShortCfg),
        ];
        flags
            .iter()
            .filter(|(set, _)| *set)
            .fold(0, |reg, (_, flag)| reg | flag.bit())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ChannelConfigStatus {
    Unchanged,
    ReadModify,
    Overwrite,
}

/// A `ChannelConfigurator` collects changes to one channel's configuration register and commits
/// them with as little bus traffic as possible. Obtain one from `Max22196::configure_channel()`,
/// chain setters on it, and end the chain with `commit()`.
///
/// ```
/// # use no_os_core::transport::noop::NoopTransport;
/// # use no_os_core::{Max22196, DeviceConfig, InputMode, FilterDelay};
/// let mut di = Max22196::new(NoopTransport, DeviceConfig::default()).unwrap();
/// di.configure_channel(2)
///     .mode(InputMode::Sink)
///     .filter(true)
///     .delay(FilterDelay::Us800)
///     .commit()
///     .unwrap();
/// ```
#[must_use = "Configuration changes are not applied unless committed"]
pub struct ChannelConfigurator<'d, T: Transport> {
    device: &'d mut Max22196<T>,
    channel: u8,
    mask: u8,
    value: u8,
}

impl<'d, T: Transport> ChannelConfigurator<'d, T> {
    pub(crate) fn new(device: &'d mut Max22196<T>, channel: u8) -> Self {
        Self {
            device,
            channel,
            mask: 0,
            value: 0,
        }
    }

    fn set_field(mut self, mask: u8, bits: u8) -> Self {
        self.mask |= mask;
        self.value = self.value & !mask | field_prep(mask, bits);
        self
    }

    pub fn high_threshold(self, enable: bool) -> Self {
        self.set_field(CFG_HITHR_MASK, enable as u8)
    }

    pub fn mode(self, mode: InputMode) -> Self {
        self.set_field(CFG_SOURCE_MASK, mode.into())
    }

    pub fn current(self, current: CurrentSetting) -> Self {
        self.set_field(CFG_CURR_MASK, current.into())
    }

    /// Enable or bypass the glitch filter.
    pub fn filter(self, enable: bool) -> Self {
        self.set_field(CFG_FLTEN_MASK, enable as u8)
    }

    pub fn delay(self, delay: FilterDelay) -> Self {
        self.set_field(CFG_DELAY_MASK, delay.into())
    }

    fn status(&self) -> ChannelConfigStatus {
        match self.mask {
            0x00 => ChannelConfigStatus::Unchanged,
            0xFF => ChannelConfigStatus::Overwrite,
            _ => ChannelConfigStatus::ReadModify,
        }
    }

    /// Commit the changes. The channel is range checked first; then nothing is sent if no field
    /// was set, a plain write if every field was set, and a read-modify-write otherwise.
    pub fn commit(self) -> Result<(), Error<T::Error>> {
        self.device.check_channel(self.channel)?;
        let reg = Register::ChannelConfig(self.channel);
        match self.status() {
            ChannelConfigStatus::Unchanged => Ok(()),
            ChannelConfigStatus::Overwrite => self.device.write(reg, self.value),
            ChannelConfigStatus::ReadModify => self.device.update(reg, self.mask, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_config_bits() {
        let cfg = ChannelConfig {
            high_threshold: true,
            mode: InputMode::Sink,
            current: CurrentSetting::ThreeX,
        };
        assert_eq!(u8::from(cfg), 0b1110_0000);
        assert_eq!(ChannelConfig::MASK, 0b1111_0000);
    }

    #[test]
    fn channel_settings_decode() {
        let settings = ChannelSettings::from(0b0101_1101);
        assert_eq!(
            settings,
            ChannelSettings {
                config: ChannelConfig {
                    high_threshold: false,
                    mode: InputMode::Sink,
                    current: CurrentSetting::OneX,
                },
                filter_enabled: true,
                filter_delay: FilterDelay::Us3200,
            }
        );
    }

    #[test]
    fn filter_delay_encoding() {
        assert_eq!(u8::from(FilterDelay::Us50), 0);
        assert_eq!(u8::from(FilterDelay::Us20000), 7);
        assert_eq!(FilterDelay::from(3), FilterDelay::Us800);
        assert_eq!(FilterDelay::from_micros(12800), Some(FilterDelay::Us12800));
        assert_eq!(FilterDelay::from_micros(1000), None);
    }

    #[test]
    fn global_config_bits() {
        assert_eq!(u8::from(GlobalConfig::default()), 0);
        let cfg = GlobalConfig {
            refdi_short_ignore: true,
            led_internal: true,
            ..GlobalConfig::default()
        };
        assert_eq!(u8::from(cfg), 0b0010_0010);
    }

    #[test]
    fn global_flag_bits_fit_mask() {
        let flags = [
            GlobalFlag::RefDiShortCfg,
            GlobalFlag::ClrFiltr,
            GlobalFlag::FspiClr,
            GlobalFlag::Led9,
            GlobalFlag::LedInt,
            GlobalFlag::Gpo,
        ];
        let all = flags.iter().fold(0, |reg, f| reg | f.bit());
        assert_eq!(all, GlobalConfig::MASK);
        assert_eq!(GlobalFlag::Gpo.bit(), 0b0000_0001);
        assert_eq!(GlobalFlag::RefDiShortCfg.bit(), 0b0010_0000);
    }

    #[test]
    fn fault_status_lookup() {
        let status = FaultStatus {
            fault1: 1 << 3,
            fault2: 1 << 4,
        };
        assert!(status.contains(Fault::TemperatureAlarm));
        assert!(status.contains(Fault::VaUndervoltage));
        assert!(!status.contains(Fault::VmLow));
        assert!(!status.is_clear());
        assert!(FaultStatus::default().is_clear());
    }

    #[test]
    fn variant_limits() {
        assert_eq!(Variant::Max22196.channels(), 8);
        assert_eq!(Variant::Max22194.channels(), 4);
        assert!(Variant::Max22196.has_counter(7));
        assert!(!Variant::Max22194.has_counter(0));
    }
}
