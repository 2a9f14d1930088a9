//! # Drive Session Module
//!
//! One controller driving one motor board.
//!
//! [`DriveSession`] routes each [`PadEvent`] to the piece that owns it:
//! sticks and triggers go through the [`InputNormalizer`] into the
//! [`MecanumMixer`], Options and Share go to the [`QuitCombo`].
//!
//! ## Buttons
//!
//! | Event | Effect |
//! |-------|--------|
//! | Options press | Quit combo check, then stop motors |
//! | Share press | Quit combo check |
//! | Options + Share | Stop motors, return [`SessionControl::Shutdown`] |

use tracing::{debug, info};

use crate::board::MotorBoard;
use crate::config::Config;
use crate::controller::events::{Button, PadEvent};
use crate::controller::normalizer::{Calibration, InputNormalizer};
use crate::error::Result;
use crate::telemetry::TelemetrySink;

use super::mixer::{MecanumMixer, MixOutcome};
use super::quit::{ComboOutcome, QuitCombo};

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    /// Motors are already stopped; terminate the process
    Shutdown,
}

/// Event routing for a single controller session.
///
/// Dropping a session whose last dispatch left wheels turning sends a final
/// stop, so unwinding never leaves the robot driving.
pub struct DriveSession<B: MotorBoard, T: TelemetrySink> {
    normalizer: InputNormalizer,
    mixer: MecanumMixer<B, T>,
    quit: QuitCombo,
    /// Set once the quit combo has stopped the motors
    quit_stopped: bool,
}

impl<B: MotorBoard, T: TelemetrySink> std::fmt::Debug for DriveSession<B, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveSession")
            .field("normalizer", &self.normalizer)
            .field("mixer", &self.mixer)
            .field("quit", &self.quit)
            .field("quit_stopped", &self.quit_stopped)
            .finish()
    }
}

impl<B: MotorBoard, T: TelemetrySink> DriveSession<B, T> {
    pub fn new(config: &Config, board: B, telemetry: T) -> Self {
        Self {
            normalizer: InputNormalizer::new(Calibration::from_config(&config.controller)),
            mixer: MecanumMixer::new(config.drive.clone(), board, telemetry),
            quit: QuitCombo::new(),
            quit_stopped: false,
        }
    }

    pub fn normalizer(&self) -> &InputNormalizer {
        &self.normalizer
    }

    pub fn mixer(&self) -> &MecanumMixer<B, T> {
        &self.mixer
    }

    /// Process one controller event.
    ///
    /// # Errors
    ///
    /// Returns the board error when a duty dispatch fails. The session is
    /// unusable after that; call [`DriveSession::stop`] and end it.
    pub fn handle(&mut self, event: PadEvent) -> Result<SessionControl> {
        match event {
            PadEvent::ButtonPressed(Button::Options) => {
                if self.quit.on_options_press() == ComboOutcome::Shutdown {
                    return Ok(self.shutdown());
                }
                debug!("Options pressed, stopping motors");
                self.mixer.stop();
            }
            PadEvent::ButtonPressed(Button::Share) => {
                if self.quit.on_share_press() == ComboOutcome::Shutdown {
                    return Ok(self.shutdown());
                }
            }
            PadEvent::ButtonReleased(Button::Options) => self.quit.on_options_release(),
            PadEvent::ButtonReleased(Button::Share) => self.quit.on_share_release(),
            _ => {
                self.normalizer.apply(&event);
                let intent = self.normalizer.normalize();
                if let MixOutcome::Dispatched(_) = self.mixer.apply(intent)? {
                    self.quit_stopped = false;
                    debug!("Dispatched intent {:?}", intent);
                }
            }
        }
        Ok(SessionControl::Continue)
    }

    /// Stop all motors regardless of debounce and change suppression.
    pub fn stop(&mut self) {
        self.mixer.stop();
    }

    /// End the session with the motors stopped.
    ///
    /// Sends a stop unless the quit combo already sent one and nothing has
    /// been dispatched since.
    pub fn close(mut self) {
        if !self.quit_stopped {
            self.mixer.stop();
        }
    }

    fn shutdown(&mut self) -> SessionControl {
        self.mixer.stop();
        self.quit_stopped = true;
        info!("Quit combo: motors stopped");
        SessionControl::Shutdown
    }
}

impl<B: MotorBoard, T: TelemetrySink> Drop for DriveSession<B, T> {
    fn drop(&mut self) {
        if self.mixer.is_driving() {
            self.mixer.stop();
        }
    }
}
