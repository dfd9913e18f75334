//! CRC5 protection for MAX22196 SPI frames.
//!
//! The checksum is computed bit-serially, MSB first, over the control byte, the data byte and
//! three trailing zero bits that flush the shift register. When a response is checked, the first
//! [`DECODE_SKIP_BITS`] bits of the control byte are left out, since the device replaces them
//! with status bits that were never part of the checksum it computed.

/// Seed of the shift register.
pub const CRC5_INIT: u8 = 0x1F;
/// Feedback polynomial, applied when the bit shifted out of bit 4 differs from the input bit.
pub const CRC5_POLY: u8 = 0x15;
/// Leading control-byte bits excluded from the checksum of a received frame.
pub const DECODE_SKIP_BITS: u32 = 2;

const CRC5_MASK: u8 = 0x1F;
const FLUSH_BITS: u32 = 3;

/// Selects which part of the control byte is covered by the checksum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// A frame about to be transmitted. The whole control byte is covered.
    Encode,
    /// A frame received from the device. The top [`DECODE_SKIP_BITS`] bits are skipped.
    Decode,
}

impl Direction {
    fn skip_bits(self) -> u32 {
        match self {
            Direction::Encode => 0,
            Direction::Decode => DECODE_SKIP_BITS,
        }
    }
}

fn shift_in(mut state: u8, byte: u8, bits: core::ops::Range<u32>) -> u8 {
    for i in bits {
        let data_bit = (byte >> (7 - i)) & 0x01;
        let state_bit = (state >> 4) & 0x01;
        state = (state << 1) & CRC5_MASK;
        if data_bit ^ state_bit != 0 {
            state ^= CRC5_POLY;
        }
    }
    state
}

/// Compute the 5-bit checksum of a `[control, data]` frame.
///
/// The result always fits in the low five bits of the returned byte, which is exactly what goes
/// on the wire as the frame's third byte.
pub fn crc5(control: u8, data: u8, direction: Direction) -> u8 {
    let state = shift_in(CRC5_INIT, control, direction.skip_bits()..8);
    let state = shift_in(state, data, 0..8);
    shift_in(state, 0x00, 0..FLUSH_BITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_known_frames() {
        // Write of 0x42 to register 0x03, chip address 0.
        assert_eq!(crc5(0x07, 0x42, Direction::Encode), 0x0A);
        // Read request for register 0x03.
        assert_eq!(crc5(0x06, 0x00, Direction::Encode), 0x0B);
        assert_eq!(crc5(0x00, 0x00, Direction::Encode), 0x07);
        assert_eq!(crc5(0xFF, 0xFF, Direction::Encode), 0x02);
        // Chip address 2, register 0x0F, write.
        assert_eq!(crc5(0x9F, 0x81, Direction::Encode), 0x0D);
    }

    #[test]
    fn decode_known_frames() {
        assert_eq!(crc5(0x00, 0x42, Direction::Decode), 0x15);
        assert_eq!(crc5(0x3F, 0xA5, Direction::Decode), 0x1F);
    }

    #[test]
    fn decode_ignores_status_bits_exhaustive() {
        for control in 0..=0xFFu8 {
            for data in 0..=0xFFu8 {
                let reference = crc5(control & 0x3F, data, Direction::Decode);
                for status in 0..4u8 {
                    let received = (status << 6) | (control & 0x3F);
                    assert_eq!(crc5(received, data, Direction::Decode), reference);
                }
            }
        }
    }

    #[test]
    fn single_bit_errors_detected_exhaustive() {
        for control in 0..=0xFFu8 {
            for data in 0..=0xFFu8 {
                let good = crc5(control, data, Direction::Decode);
                for bit in 0..8 {
                    assert_ne!(crc5(control, data ^ (1 << bit), Direction::Decode), good);
                }
                for bit in 0..6 {
                    assert_ne!(crc5(control ^ (1 << bit), data, Direction::Decode), good);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn checksum_fits_five_bits(
            control in any::<u8>(),
            data in any::<u8>(),
            encode in any::<bool>(),
        ) {
            let direction = if encode { Direction::Encode } else { Direction::Decode };
            prop_assert!(crc5(control, data, direction) <= 0x1F);
        }

        #[test]
        fn encode_and_decode_differ_only_by_skipped_prefix(
            control in any::<u8>(),
            data in any::<u8>(),
        ) {
            // Shifting the two skipped bits in by hand recovers the encode checksum from the
            // decode path's starting point.
            let prefix = shift_in(CRC5_INIT, control, 0..DECODE_SKIP_BITS);
            let state = shift_in(prefix, control, DECODE_SKIP_BITS..8);
            let state = shift_in(state, data, 0..8);
            prop_assert_eq!(
                shift_in(state, 0, 0..FLUSH_BITS),
                crc5(control, data, Direction::Encode)
            );
        }
    }
}
