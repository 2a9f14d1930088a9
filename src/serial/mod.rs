//! # Serial Communication Module
//!
//! Serial link to the motor expansion board.
//!
//! This module handles:
//! - Opening the board's UART at 1,000,000 baud, 8N1
//! - Falling back to the USB CDC port when the primary is absent
//! - A writer task that owns the port, so dispatching duties never blocks
//!   the controller event loop
//!
//! ## Writer Task
//!
//! [`spawn_writer`] moves the port into a tokio task and returns a
//! [`SerialBoard`] handle. Each [`MotorBoard::set_motor_duty`] call encodes
//! one frame and queues it; the task writes and flushes frames in order.
//! When the port fails the task ends with the error and later dispatches
//! return [`MecanumPadError::BoardDisconnected`].

pub mod port_trait;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, info, warn};

use crate::board::encoder::encode_motor_duty_frame;
use crate::board::{MotorBoard, MotorDuty};
use crate::error::{MecanumPadError, Result};

pub use port_trait::{SerialPortIO, TokioSerialPort};

/// Motor board baud rate
pub const BOARD_BAUD_RATE: u32 = 1_000_000;

/// Tried after the configured port
const FALLBACK_DEVICE_PATH: &str = "/dev/ttyACM0";

/// Opened serial connection to the motor board.
pub struct BoardSerial {
    port: tokio_serial::SerialStream,
    device_path: String,
}

impl std::fmt::Debug for BoardSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl BoardSerial {
    /// Open the board at `path`, falling back to `/dev/ttyACM0`.
    ///
    /// # Errors
    ///
    /// Returns `SerialPortNotFound` listing every path tried when none opens.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mecanum_pad::serial::{BoardSerial, BOARD_BAUD_RATE};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let serial = BoardSerial::open("/dev/ttyAMA0", BOARD_BAUD_RATE)?;
    ///     println!("Board at {}", serial.device_path());
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str, baud_rate: u32) -> Result<Self> {
        if path == FALLBACK_DEVICE_PATH {
            return Self::open_with_paths(&[path], baud_rate);
        }
        Self::open_with_paths(&[path, FALLBACK_DEVICE_PATH], baud_rate)
    }

    /// Open the first of `paths` that succeeds.
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Opened motor board at {} ({} baud)", path, baud_rate);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                    });
                }
                Err(e) => warn!("{}", e),
            }
        }

        Err(MecanumPadError::SerialPortNotFound(paths.join(", ")))
    }

    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| MecanumPadError::Serial(format!("Failed to open {}: {}", path, e)))
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Hand the stream over to a writer task.
    pub fn into_port(self) -> TokioSerialPort {
        TokioSerialPort::new(self.port)
    }
}

/// [`MotorBoard`] handle feeding the writer task.
#[derive(Debug, Clone)]
pub struct SerialBoard {
    tx: mpsc::UnboundedSender<Bytes>,
}

impl MotorBoard for SerialBoard {
    fn set_motor_duty(&mut self, duties: &[MotorDuty]) -> Result<()> {
        self.tx
            .send(encode_motor_duty_frame(duties))
            .map_err(|_| MecanumPadError::BoardDisconnected)
    }
}

/// Move `port` into a writer task.
///
/// The task finishes with `Ok(())` once every [`SerialBoard`] handle is
/// dropped and the queue is drained, or with the first I/O error.
///
/// Must be called from within a tokio runtime.
pub fn spawn_writer<P>(mut port: P) -> (SerialBoard, JoinHandle<Result<()>>)
where
    P: SerialPortIO + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Bytes>();

    let handle = tokio::spawn(async move {
        let mut frames: u64 = 0;
        while let Some(frame) = rx.recv().await {
            port.write_all(&frame)
                .await
                .map_err(|e| MecanumPadError::Serial(format!("Failed to write frame: {}", e)))?;
            port.flush()
                .await
                .map_err(|e| MecanumPadError::Serial(format!("Failed to flush serial port: {}", e)))?;
            frames += 1;
            debug!("Sent motor frame ({} bytes)", frame.len());
        }
        info!("Board writer finished after {} frames", frames);
        Ok(())
    });

    (SerialBoard { tx }, handle)
}
