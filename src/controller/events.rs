//! # Controller Event Mapper Module
//!
//! This module turns raw evdev events from a PlayStation controller into the
//! discrete [`PadEvent`]s the drive session consumes.
//!
//! ## Raw Range
//!
//! evdev reports sticks and triggers in the device range (0-255 on DualShock 4
//! and DualSense). The mapper rescales every axis to `-raw_max..=raw_max`
//! (`-32767..=32767` by default), the same linear map the kernel joystick
//! layer applies. A released trigger therefore reads `-raw_max`, and only the
//! upper half of the trigger travel produces positive values.
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Event |
//! |------|------------|-------|
//! | Left Stick X | ABS_X | Strafe |
//! | Left Stick Y | ABS_Y | Forward (up = negative) |
//! | L2 Trigger | ABS_Z | Rotate left |
//! | R2 Trigger | ABS_RZ | Rotate right |
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code | Event |
//! |--------|------------|-------|
//! | Share | BTN_SELECT | Quit combo |
//! | Options | BTN_START | Safety stop, quit combo |
//! | L2 (click) | BTN_TL2 | L2 at rest on release |
//! | R2 (click) | BTN_TR2 | R2 at rest on release |
//!
//! ## Usage
//!
//! ```no_run
//! use mecanum_pad::controller::events::{EventMapper, RAW_MAX};
//! use mecanum_pad::controller::gamepad::Gamepad;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let gamepad = Gamepad::open("/dev/input/event0")?;
//! let mut mapper = EventMapper::new(0, 255, RAW_MAX);
//! let mut events = gamepad.into_event_stream()?;
//!
//! loop {
//!     let event = events.next_event().await?;
//!     for pad_event in mapper.translate(&event) {
//!         println!("{:?}", pad_event);
//!     }
//! }
//! # }
//! ```

use evdev::{AbsoluteAxisType, InputEvent, InputEventKind, Key};

use crate::config::ControllerConfig;

/// Default magnitude of the rescaled joystick range.
pub const RAW_MAX: i32 = 32767;

/// evdev key value for a released key.
const KEY_RELEASED: i32 = 0;
/// evdev key value for a pressed key.
const KEY_PRESSED: i32 = 1;

/// Left stick axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickAxis {
    X,
    Y,
}

/// Which part of the stick came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickRest {
    X,
    Y,
    Both,
}

/// Analog trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// L2
    Left,
    /// R2
    Right,
}

/// Buttons the drive session reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Options,
    Share,
}

/// A discrete controller input transition.
///
/// Values are in the mapper's `-raw_max..=raw_max` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadEvent {
    StickMoved { axis: StickAxis, value: i32 },
    StickAtRest(StickRest),
    TriggerPressed { trigger: Trigger, value: i32 },
    TriggerReleased(Trigger),
    TriggerAtRest(Trigger),
    ButtonPressed(Button),
    ButtonReleased(Button),
}

/// Rescales a device axis value from `[min, max]` to `-raw_max..=raw_max`.
///
/// Out-of-range input is clamped first. A degenerate range maps to 0.
///
/// # Examples
///
/// ```
/// use mecanum_pad::controller::events::{scale_axis, RAW_MAX};
///
/// assert_eq!(scale_axis(0, 0, 255, RAW_MAX), -32767);
/// assert_eq!(scale_axis(255, 0, 255, RAW_MAX), 32767);
/// ```
#[must_use]
pub fn scale_axis(value: i32, min: i32, max: i32, raw_max: i32) -> i32 {
    let span = i64::from(max) - i64::from(min);
    if span <= 0 {
        return 0;
    }
    let offset = i64::from(value.clamp(min, max)) - i64::from(min);
    let raw_max = i64::from(raw_max);
    (offset * 2 * raw_max / span - raw_max) as i32
}

/// Translates evdev events into [`PadEvent`]s.
///
/// Tracks whether each stick axis sits at the device center so that a
/// combined at-rest can be reported when both axes settle.
///
/// # Thread Safety
///
/// `EventMapper` is not thread-safe. Use from a single task/thread only.
#[derive(Debug)]
pub struct EventMapper {
    axis_min: i32,
    axis_max: i32,
    axis_center: i32,
    raw_max: i32,
    x_at_rest: bool,
    y_at_rest: bool,
}

impl Default for EventMapper {
    fn default() -> Self {
        Self::new(0, 255, RAW_MAX)
    }
}

impl EventMapper {
    /// Creates a mapper for a device reporting axes in `[axis_min, axis_max]`,
    /// rescaling them to `-raw_max..=raw_max`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mecanum_pad::controller::events::{EventMapper, RAW_MAX};
    ///
    /// let mapper = EventMapper::new(0, 255, RAW_MAX);
    /// assert_eq!(mapper.axis_center(), 128);
    /// ```
    #[must_use]
    pub fn new(axis_min: i32, axis_max: i32, raw_max: i32) -> Self {
        Self {
            axis_min,
            axis_max,
            axis_center: axis_min + (axis_max - axis_min + 1) / 2,
            raw_max,
            x_at_rest: true,
            y_at_rest: true,
        }
    }

    /// Mapper for the configured device range, scaled to the same `raw_max`
    /// the normalizer divides by.
    #[must_use]
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.axis_min, config.axis_max, config.raw_max)
    }

    /// Device value treated as stick center.
    #[must_use]
    pub fn axis_center(&self) -> i32 {
        self.axis_center
    }

    /// Processes a single evdev input event.
    ///
    /// Returns zero or more pad events. Sync events, unmapped axes (right
    /// stick, d-pad, motion sensors), unmapped keys and key auto-repeat yield
    /// nothing.
    pub fn translate(&mut self, event: &InputEvent) -> Vec<PadEvent> {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => self.translate_axis(axis, event.value()),
            InputEventKind::Key(key) => self.translate_key(key, event.value()),
            _ => Vec::new(),
        }
    }

    fn translate_axis(&mut self, axis: AbsoluteAxisType, value: i32) -> Vec<PadEvent> {
        match axis {
            AbsoluteAxisType::ABS_X => self.translate_stick(StickAxis::X, value),
            AbsoluteAxisType::ABS_Y => self.translate_stick(StickAxis::Y, value),
            AbsoluteAxisType::ABS_Z => self.translate_trigger(Trigger::Left, value),
            AbsoluteAxisType::ABS_RZ => self.translate_trigger(Trigger::Right, value),
            _ => Vec::new(),
        }
    }

    fn translate_stick(&mut self, axis: StickAxis, value: i32) -> Vec<PadEvent> {
        let at_rest = value == self.axis_center;
        match axis {
            StickAxis::X => self.x_at_rest = at_rest,
            StickAxis::Y => self.y_at_rest = at_rest,
        }

        if !at_rest {
            let value = scale_axis(value, self.axis_min, self.axis_max, self.raw_max);
            return vec![PadEvent::StickMoved { axis, value }];
        }

        let rest = if self.x_at_rest && self.y_at_rest {
            StickRest::Both
        } else {
            match axis {
                StickAxis::X => StickRest::X,
                StickAxis::Y => StickRest::Y,
            }
        };
        vec![PadEvent::StickAtRest(rest)]
    }

    fn translate_trigger(&mut self, trigger: Trigger, value: i32) -> Vec<PadEvent> {
        if value <= self.axis_min {
            return vec![PadEvent::TriggerReleased(trigger)];
        }
        let value = scale_axis(value, self.axis_min, self.axis_max, self.raw_max);
        vec![PadEvent::TriggerPressed { trigger, value }]
    }

    fn translate_key(&mut self, key: Key, value: i32) -> Vec<PadEvent> {
        let pressed = match value {
            KEY_PRESSED => true,
            KEY_RELEASED => false,
            _ => return Vec::new(), // auto-repeat
        };

        let event = match (key, pressed) {
            (Key::BTN_START, true) => PadEvent::ButtonPressed(Button::Options),
            (Key::BTN_START, false) => PadEvent::ButtonReleased(Button::Options),
            (Key::BTN_SELECT, true) => PadEvent::ButtonPressed(Button::Share),
            (Key::BTN_SELECT, false) => PadEvent::ButtonReleased(Button::Share),
            (Key::BTN_TL2, false) => PadEvent::TriggerAtRest(Trigger::Left),
            (Key::BTN_TR2, false) => PadEvent::TriggerAtRest(Trigger::Right),
            _ => return Vec::new(),
        };
        vec![event]
    }
}
