//! The MAX22196 register map and the bit fields of the frame control byte.

/// Number of channels on the largest variant; sizes the per-channel register blocks.
pub const MAX_CHANNELS: u8 = 8;

/// Chip address field of the control byte (multi-drop bus select).
pub const CHIP_ADDR_MASK: u8 = 0b1100_0000;
/// Register address field of the control byte.
pub const REG_ADDR_MASK: u8 = 0b0011_1110;
/// Read/write bit of the control byte. Set for a write.
pub const RW_MASK: u8 = 0b0000_0001;
/// Largest chip address that fits the control byte.
pub const MAX_CHIP_ADDRESS: u8 = 3;
/// Largest register address that fits the control byte.
pub const MAX_REG_ADDRESS: u8 = REG_ADDR_MASK >> 1;

// Channel configuration register fields.
pub const CFG_HITHR_MASK: u8 = 0b1000_0000;
pub const CFG_SOURCE_MASK: u8 = 0b0100_0000;
pub const CFG_CURR_MASK: u8 = 0b0011_0000;
pub const CFG_FLTEN_MASK: u8 = 0b0000_1000;
pub const CFG_DELAY_MASK: u8 = 0b0000_0111;

/// Place `value` into the bit field described by `mask`, like the C `field_prep` helpers.
pub(crate) fn field_prep(mask: u8, value: u8) -> u8 {
    (value << mask.trailing_zeros()) & mask
}

/// Extract the bit field described by `mask` from `reg`.
pub(crate) fn field_get(mask: u8, reg: u8) -> u8 {
    (reg & mask) >> mask.trailing_zeros()
}

/// A register address within the MAX22196. Created by conversion from [`Register`] or by
/// checked conversion from a raw `u8`, so an address that doesn't fit the 5-bit field can't reach
/// the frame encoder.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct RegisterAddress(pub(crate) u8);

impl RegisterAddress {
    /// Validate a raw register address.
    pub fn new(addr: u8) -> Option<Self> {
        if addr <= MAX_REG_ADDRESS {
            Some(RegisterAddress(addr))
        } else {
            None
        }
    }
}

impl From<RegisterAddress> for u8 {
    fn from(addr: RegisterAddress) -> u8 {
        addr.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Register {
    /// Live state of all digital inputs, one bit per channel.
    DiState,
    /// Latched FAULT1 flags. Reading clears them.
    Fault1,
    /// Enables for the FAULT1 flags on the FAULT pin.
    Fault1Mask,
    /// Per-channel configuration: threshold, source/sink mode, current, glitch filter.
    ChannelConfig(u8),
    /// Global configuration (reference short handling, filter clearing, LED and GPO control).
    GlobalConfig,
    /// LED control.
    Led,
    /// Latched FAULT2 flags. Reading clears them.
    Fault2,
    /// Enables for the FAULT2 flags.
    Fault2Mask,
    /// Counter gate, bit `ch` runs the pulse counter of channel `ch`.
    StartStop,
    /// Low byte of a channel's pulse counter.
    CounterLsb(u8),
    /// High byte of a channel's pulse counter.
    CounterMsb(u8),
}

fn valid_channel(ch: u8) -> u8 {
    match ch {
        0..=7 => ch,
        _ => panic!("MAX22196 does not have channel {}", ch),
    }
}

impl From<Register> for RegisterAddress {
    fn from(reg: Register) -> RegisterAddress {
        use self::Register::*;
        match reg {
            DiState => RegisterAddress(0x00),
            Fault1 => RegisterAddress(0x01),
            Fault1Mask => RegisterAddress(0x02),
            ChannelConfig(ch) => RegisterAddress(0x03 + valid_channel(ch)),
            GlobalConfig => RegisterAddress(0x0B),
            Led => RegisterAddress(0x0C),
            Fault2 => RegisterAddress(0x0D),
            Fault2Mask => RegisterAddress(0x0E),
            StartStop => RegisterAddress(0x0F),
            CounterLsb(ch) => RegisterAddress(0x10 + 2 * valid_channel(ch)),
            CounterMsb(ch) => RegisterAddress(0x11 + 2 * valid_channel(ch)),
        }
    }
}
