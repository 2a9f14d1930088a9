//! # Motor Board Protocol Constants and Types
//!
//! Framing for the expansion board's serial command protocol.
//!
//! ```text
//! 0xAA 0x55 | function | length | payload (length bytes) | crc8
//! ```
//!
//! The CRC covers function, length and payload.

/// First frame header byte
pub const FRAME_HEADER_1: u8 = 0xAA;

/// Second frame header byte
pub const FRAME_HEADER_2: u8 = 0x55;

/// Header (2) + function (1) + length (1) + crc (1)
pub const FRAME_OVERHEAD: usize = 5;

/// Largest payload the one-byte length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u8::MAX as usize;

/// Motor sub-command: set duty for a list of motors
pub const MOTOR_SUBCMD_DUTY: u8 = 0x05;

/// Bytes per motor entry in a duty payload: id (u8) + duty (f32 LE)
pub const MOTOR_ENTRY_SIZE: usize = 5;

/// Packet function codes sent to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketFunction {
    Motor = 3,
}

impl From<PacketFunction> for u8 {
    fn from(function: PacketFunction) -> Self {
        function as u8
    }
}

/// One motor command: board port (1-based) and signed duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotorDuty {
    pub port: u8,
    pub duty: i32,
}

impl MotorDuty {
    #[must_use]
    pub fn new(port: u8, duty: i32) -> Self {
        Self { port, duty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bytes() {
        assert_eq!(FRAME_HEADER_1, 0xAA);
        assert_eq!(FRAME_HEADER_2, 0x55);
    }

    #[test]
    fn test_motor_function_code() {
        assert_eq!(u8::from(PacketFunction::Motor), 3);
    }
}
