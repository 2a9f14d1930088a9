//! # Gamepad Device Module
//!
//! Opens the controller's evdev node and hands out its event stream.
//!
//! The device path comes from configuration; no scanning or pairing happens
//! here. When the controller is not connected yet, [`Gamepad::wait_for`] keeps
//! retrying until the connect timeout runs out.

use evdev::{Device, EventStream};
use std::path::Path;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::error::{MecanumPadError, Result};

/// Delay between attempts while waiting for the controller to appear.
const RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// An opened controller device.
pub struct Gamepad {
    device: Device,
    device_path: String,
}

impl std::fmt::Debug for Gamepad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gamepad")
            .field("device_path", &self.device_path)
            .field("name", &self.device.name())
            .finish_non_exhaustive()
    }
}

impl Gamepad {
    /// Open the controller at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Controller` if the node does not exist or cannot be opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mecanum_pad::controller::gamepad::Gamepad;
    ///
    /// let gamepad = Gamepad::open("/dev/input/event0")?;
    /// println!("Connected to {:?}", gamepad.name());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path).map_err(|e| {
            MecanumPadError::Controller(format!("Failed to open {}: {}", path.display(), e))
        })?;
        let device_path = path.to_string_lossy().to_string();

        info!(
            "Opened controller {:?} at {}",
            device.name().unwrap_or("unknown"),
            device_path
        );

        Ok(Self {
            device,
            device_path,
        })
    }

    /// Open the controller at `path`, retrying until `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns `ControllerNotFound` when the deadline passes without a
    /// successful open.
    pub async fn wait_for(path: &str, timeout: Duration) -> Result<Self> {
        let deadline = Instant::now() + timeout;

        loop {
            match Self::open(path) {
                Ok(gamepad) => return Ok(gamepad),
                Err(e) => debug!("Controller not ready: {}", e),
            }

            if Instant::now() + RETRY_INTERVAL > deadline {
                return Err(MecanumPadError::ControllerNotFound {
                    path: path.to_string(),
                    timeout_s: timeout.as_secs(),
                });
            }
            sleep(RETRY_INTERVAL).await;
        }
    }

    /// Get the device path of this controller
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Get controller name from evdev
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }

    /// Convert into an async event stream for the tokio event loop.
    ///
    /// # Errors
    ///
    /// Returns `Controller` if the device cannot be switched to non-blocking mode.
    pub fn into_event_stream(self) -> Result<EventStream> {
        let path = self.device_path;
        self.device.into_event_stream().map_err(|e| {
            MecanumPadError::Controller(format!("Failed to stream events from {}: {}", path, e))
        })
    }
}
