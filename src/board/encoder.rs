//! # Motor Board Packet Encoder
//!
//! Encodes commands into complete board frames.

use bytes::{BufMut, Bytes, BytesMut};

use super::crc::crc8_maxim;
use super::protocol::*;

/// Wrap a payload into a complete frame
///
/// # Returns
///
/// * `Bytes` - header + function + length + payload + crc
///
/// # Panics
///
/// Panics if `payload` is longer than [`MAX_PAYLOAD_SIZE`]. Duty payloads
/// for the four motor ports never come close.
pub fn encode_frame(function: PacketFunction, payload: &[u8]) -> Bytes {
    assert!(
        payload.len() <= MAX_PAYLOAD_SIZE,
        "payload of {} bytes does not fit a frame",
        payload.len()
    );

    let mut frame = BytesMut::with_capacity(FRAME_OVERHEAD + payload.len());
    frame.put_u8(FRAME_HEADER_1);
    frame.put_u8(FRAME_HEADER_2);
    frame.put_u8(function.into());
    frame.put_u8(payload.len() as u8);
    frame.put_slice(payload);

    // CRC over Function + Length + Payload
    let crc = crc8_maxim(&frame[2..]);
    frame.put_u8(crc);

    frame.freeze()
}

/// Encode a motor duty payload
///
/// Layout: sub-command, motor count, then per motor the zero-based motor id
/// and the duty as little-endian `f32`.
pub fn encode_motor_duty_payload(duties: &[MotorDuty]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + duties.len() * MOTOR_ENTRY_SIZE);
    payload.put_u8(MOTOR_SUBCMD_DUTY);
    payload.put_u8(duties.len() as u8);

    for duty in duties {
        payload.put_u8(duty.port.saturating_sub(1));
        payload.put_f32_le(duty.duty as f32);
    }

    payload
}

/// Encode a complete motor duty frame
///
/// # Examples
///
/// ```
/// use mecanum_pad::board::encoder::encode_motor_duty_frame;
/// use mecanum_pad::board::protocol::MotorDuty;
///
/// let frame = encode_motor_duty_frame(&[MotorDuty::new(1, 0)]);
/// assert_eq!(&frame[..4], &[0xAA, 0x55, 0x03, 0x07]);
/// ```
pub fn encode_motor_duty_frame(duties: &[MotorDuty]) -> Bytes {
    encode_frame(PacketFunction::Motor, &encode_motor_duty_payload(duties))
}
