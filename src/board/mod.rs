//! # Motor Board Module
//!
//! Command protocol for the motor expansion board and the [`MotorBoard`]
//! seam the drive pipeline writes through.
//!
//! This module handles:
//! - Frame layout and function codes
//! - CRC-8/MAXIM checksums
//! - Motor duty packet encoding

pub mod protocol;
pub mod encoder;
pub mod crc;

pub use protocol::MotorDuty;

use crate::error::Result;

/// Sink for motor duty commands.
///
/// Implementations must not block: the call sits on the controller event
/// path. Delivery is fire-and-forget, no retries.
#[cfg_attr(test, mockall::automock)]
pub trait MotorBoard {
    /// Send duties for the listed ports, in order.
    fn set_motor_duty(&mut self, duties: &[MotorDuty]) -> Result<()>;
}

impl<B: MotorBoard + ?Sized> MotorBoard for Box<B> {
    fn set_motor_duty(&mut self, duties: &[MotorDuty]) -> Result<()> {
        (**self).set_motor_duty(duties)
    }
}
