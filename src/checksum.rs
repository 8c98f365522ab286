//! CRC-8 validation of sensor responses.
//!
//! The SHTC3 follows every 16-bit data word with a CRC-8 computed over its two bytes:
//! polynomial `0x31` (x^8 + x^5 + x^4 + 1), initial value `0xFF`, no input or output
//! reflection and no final XOR. That is the CRC-8/NRSC-5 entry of the CRC catalogue.

use crc::{CRC_8_NRSC_5, Crc};

const SENSIRION_CRC: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

/// Size of one response group: two data bytes followed by their checksum.
pub const GROUP_LEN: usize = 3;

/// Computes the checksum the sensor appends to `data`.
pub fn crc8(data: &[u8]) -> u8 {
    SENSIRION_CRC.checksum(data)
}

/// Checks every 3-byte group of `frame` against its checksum byte.
///
/// Returns `false` on the first group whose checksum does not match, and for a frame whose
/// length is not a multiple of [`GROUP_LEN`].
pub fn verify(frame: &[u8]) -> bool {
    if frame.len() % GROUP_LEN != 0 {
        error!("Frame length {} is not a multiple of 3", frame.len());
        return false;
    }

    for (index, group) in frame.chunks_exact(GROUP_LEN).enumerate() {
        let expected = crc8(&group[..2]);
        if expected != group[2] {
            error!(
                "CRC failed in group {}: computed {:#x}, received {:#x}",
                index, expected, group[2]
            );
            return false;
        }
    }

    debug!("Checksum OK");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datasheet_vector() {
        // Sensirion's reference example: 0xBEEF -> 0x92
        assert_eq!(crc8(&[0xBE, 0xEF]), 0x92);
        assert!(verify(&[0xBE, 0xEF, 0x92]));
    }

    #[test]
    fn test_id_vector() {
        // ID word 0x0887 as returned by an SHTC3
        assert_eq!(crc8(&[0x08, 0x87]), 0x5B);
        assert!(verify(&[0x08, 0x87, 0x5B]));
    }

    #[test]
    fn test_measurement_vector() {
        let frame = [0x5A, 0x3C, 0x30, 0x66, 0x8A, 0x2F];
        assert!(verify(&frame));
    }

    #[test]
    fn test_generated_pairs_verify() {
        for word in (0..=u16::MAX).step_by(257) {
            let [hi, lo] = word.to_be_bytes();
            assert!(verify(&[hi, lo, crc8(&[hi, lo])]), "word {word:#06x}");
        }
    }

    #[test]
    fn test_single_bit_flip_is_detected() {
        for word in [0x0000u16, 0x0887, 0x5A3C, 0xBEEF, 0xFFFF] {
            let [hi, lo] = word.to_be_bytes();
            let crc = crc8(&[hi, lo]);

            for bit in 0..16 {
                let [hi, lo] = (word ^ (1 << bit)).to_be_bytes();
                assert!(!verify(&[hi, lo, crc]), "word {word:#06x} bit {bit}");
            }
        }
    }

    #[test]
    fn test_second_group_mismatch() {
        // Humidity group intact, temperature checksum corrupted
        let frame = [0x5A, 0x3C, 0x30, 0x66, 0x8A, 0x2E];
        assert!(!verify(&frame));
    }

    #[test]
    fn test_partial_group_is_rejected() {
        assert!(!verify(&[0xBE, 0xEF]));
        assert!(!verify(&[0xBE, 0xEF, 0x92, 0x00]));
    }

    #[test]
    fn test_input_is_not_modified() {
        let frame = [0x08, 0x87, 0x5B];
        let copy = frame;
        verify(&frame);
        assert_eq!(frame, copy);
    }
}
