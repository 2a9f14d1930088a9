//! # Mecanum Mixer Module
//!
//! Turns a [`NormalizedIntent`] into four wheel duties and dispatches them.
//!
//! ## Pipeline
//!
//! 1. Debounce against the last accepted intent (`min_change`)
//! 2. Brake gesture (both triggers) forces all wheels to zero
//! 3. Mecanum mix:
//!    ```text
//!    front_left  = y + x + r
//!    front_right = y - x - r
//!    rear_left   = y - x + r
//!    rear_right  = y + x - r
//!    ```
//! 4. Divide by `max(1, max |wheel|)` so no wheel exceeds 1.0
//! 5. `duty = trunc(value * max_duty * sign)`, mapped to the wheel's port
//! 6. Skip the write when the (port, duty) list equals the last one sent
//!
//! ## Usage
//!
//! ```
//! use mecanum_pad::board::{MotorBoard, MotorDuty};
//! use mecanum_pad::config::DriveConfig;
//! use mecanum_pad::controller::normalizer::NormalizedIntent;
//! use mecanum_pad::drive::mixer::{MecanumMixer, MixOutcome};
//! use mecanum_pad::telemetry::NullTelemetry;
//!
//! struct PrintBoard;
//!
//! impl MotorBoard for PrintBoard {
//!     fn set_motor_duty(&mut self, duties: &[MotorDuty]) -> mecanum_pad::error::Result<()> {
//!         println!("{:?}", duties);
//!         Ok(())
//!     }
//! }
//!
//! let mut mixer = MecanumMixer::new(DriveConfig::default(), PrintBoard, NullTelemetry);
//! let intent = NormalizedIntent { forward: 1.0, ..NormalizedIntent::default() };
//!
//! match mixer.apply(intent)? {
//!     MixOutcome::Dispatched(duties) => assert_eq!(duties.front_right, 70),
//!     other => panic!("unexpected {:?}", other),
//! }
//! # Ok::<(), mecanum_pad::error::MecanumPadError>(())
//! ```

use tracing::{debug, error, trace};

use crate::board::{MotorBoard, MotorDuty};
use crate::config::DriveConfig;
use crate::controller::normalizer::NormalizedIntent;
use crate::error::Result;
use crate::telemetry::{TelemetrySink, WheelRecord};

use super::wheels::{WheelConfig, Wheels};

/// What a call to [`MecanumMixer::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixOutcome {
    /// Intent moved less than `min_change`; nothing recomputed
    Debounced,
    /// Recomputed duties match the last dispatch; nothing sent
    Unchanged,
    /// New duties were sent to the board and logged
    Dispatched(Wheels<i32>),
}

/// Raw mecanum mix. The brake gesture yields all zeros.
#[must_use]
pub fn mix(intent: &NormalizedIntent) -> Wheels<f64> {
    if intent.brake {
        return Wheels::splat(0.0);
    }

    let (x, y, r) = (intent.strafe, intent.forward, intent.rotate);
    Wheels {
        front_left: y + x + r,
        front_right: y - x - r,
        rear_left: y - x + r,
        rear_right: y + x - r,
    }
}

/// Scales all wheels down by the largest magnitude when it exceeds 1.0.
///
/// Sub-unity sets are returned unchanged.
#[must_use]
pub fn desaturate(wheels: Wheels<f64>) -> Wheels<f64> {
    let peak = wheels
        .as_array()
        .iter()
        .fold(1.0_f64, |acc, v| acc.max(v.abs()));
    wheels.map(|v| v / peak)
}

/// Converts normalized wheel values to signed integer duties (truncating).
#[must_use]
pub fn quantize(normalized: Wheels<f64>, layout: &Wheels<WheelConfig>, max_duty: i32) -> Wheels<i32> {
    let max_duty = f64::from(max_duty);
    normalized.zip_with(*layout, |value, wheel| {
        (value * max_duty * f64::from(wheel.sign)) as i32
    })
}

/// Board commands in dispatch order FL, FR, RL, RR.
#[must_use]
pub fn to_commands(duties: Wheels<i32>, layout: &Wheels<WheelConfig>) -> [MotorDuty; 4] {
    duties
        .zip_with(*layout, |duty, wheel| MotorDuty::new(wheel.port, duty))
        .as_array()
}

/// Mixes intents into wheel duties and writes changes to the board.
///
/// Owns the debounce and change-suppression caches. Not thread-safe; drive
/// it from the single event loop.
pub struct MecanumMixer<B, T> {
    config: DriveConfig,
    board: B,
    telemetry: T,
    last_intent: NormalizedIntent,
    last_dispatched: Option<[MotorDuty; 4]>,
}

impl<B, T> std::fmt::Debug for MecanumMixer<B, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MecanumMixer")
            .field("config", &self.config)
            .field("last_intent", &self.last_intent)
            .field("last_dispatched", &self.last_dispatched)
            .finish_non_exhaustive()
    }
}

impl<B: MotorBoard, T: TelemetrySink> MecanumMixer<B, T> {
    pub fn new(config: DriveConfig, board: B, telemetry: T) -> Self {
        Self {
            config,
            board,
            telemetry,
            last_intent: NormalizedIntent::default(),
            last_dispatched: None,
        }
    }

    /// Last intent that passed the debounce.
    pub fn last_intent(&self) -> &NormalizedIntent {
        &self.last_intent
    }

    /// Commands most recently sent, `None` after a stop.
    pub fn last_dispatched(&self) -> Option<&[MotorDuty; 4]> {
        self.last_dispatched.as_ref()
    }

    /// Whether the last dispatch left any wheel turning.
    pub fn is_driving(&self) -> bool {
        self.last_dispatched
            .map_or(false, |commands| commands.iter().any(|c| c.duty != 0))
    }

    /// Run the pipeline for a new intent.
    ///
    /// # Errors
    ///
    /// Returns the board's error if the dispatch fails. The failed duties
    /// are not remembered, so the next change is sent again.
    pub fn apply(&mut self, intent: NormalizedIntent) -> Result<MixOutcome> {
        if intent.within(&self.last_intent, self.config.min_change) {
            trace!("Intent within {} of last, skipping", self.config.min_change);
            return Ok(MixOutcome::Debounced);
        }
        self.last_intent = intent;

        let normalized = desaturate(mix(&intent));
        let duties = quantize(normalized, &self.config.wheels, self.config.max_duty);
        let commands = to_commands(duties, &self.config.wheels);

        if self.last_dispatched.as_ref() == Some(&commands) {
            return Ok(MixOutcome::Unchanged);
        }

        self.board.set_motor_duty(&commands)?;
        self.telemetry.record(&WheelRecord::new(normalized, duties));
        debug!(
            "Duties FL={} FR={} RL={} RR={}",
            duties.front_left, duties.front_right, duties.rear_left, duties.rear_right
        );

        self.last_dispatched = Some(commands);
        Ok(MixOutcome::Dispatched(duties))
    }

    /// Send zero duty to every wheel and forget the last dispatch.
    ///
    /// Always writes, whatever the caches hold. Board failures are logged,
    /// never returned, so this is safe on every shutdown path.
    pub fn stop(&mut self) {
        let commands = to_commands(Wheels::splat(0), &self.config.wheels);

        match self.board.set_motor_duty(&commands) {
            Ok(()) => debug!("Motors stopped"),
            Err(e) => error!("Failed to stop motors: {}", e),
        }
        self.last_dispatched = None;
    }
}
