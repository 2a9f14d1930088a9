//! # CRC-8/MAXIM Implementation
//!
//! Checksum used by the motor board protocol (Dallas/Maxim 1-Wire CRC).
//!
//! **Polynomial**: 0x31, reflected (0x8C)
//! **Initial Value**: 0x00

/// Reflected CRC-8/MAXIM polynomial
const CRC8_POLY_REFLECTED: u8 = 0x8C;

/// Precomputed CRC8 lookup table for fast calculation
const CRC8_TABLE: [u8; 256] = generate_crc8_table();

/// Generate CRC8 lookup table at compile time
const fn generate_crc8_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u8;
        let mut j = 0;

        while j < 8 {
            if (crc & 0x01) != 0 {
                crc = (crc >> 1) ^ CRC8_POLY_REFLECTED;
            } else {
                crc >>= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC-8/MAXIM checksum using lookup table
///
/// # Arguments
///
/// * `data` - Byte slice to calculate CRC for (Function + Length + Payload)
///
/// # Examples
///
/// ```
/// use mecanum_pad::board::crc::crc8_maxim;
///
/// assert_eq!(crc8_maxim(b"123456789"), 0xA1);
/// ```
pub fn crc8_maxim(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;

    for &byte in data {
        crc = CRC8_TABLE[(crc ^ byte) as usize];
    }

    crc
}

/// Bitwise CRC-8/MAXIM (slow, for verification)
#[cfg(test)]
fn crc8_maxim_slow(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;

    for &byte in data {
        crc ^= byte;

        for _ in 0..8 {
            if (crc & 0x01) != 0 {
                crc = (crc >> 1) ^ CRC8_POLY_REFLECTED;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
