//! # Input Normalizer Module
//!
//! Keeps the raw left-stick and trigger state and turns it into a
//! [`NormalizedIntent`] (strafe, forward, rotate).
//!
//! ## Stick Deadzone
//!
//! A stick sample whose magnitude is below `deadzone * raw_max` is exactly
//! 0.0. Outside the deadzone the value is a plain linear `raw / raw_max`,
//! clamped to -1..1. There is no rescaling of the remaining travel, so the
//! first value past the deadzone is `deadzone` itself.
//!
//! ## Triggers
//!
//! Triggers report negative values over the first half of their travel.
//! Anything `<= 0` counts as "not engaged"; positive values map linearly to
//! 0..1. Rotation is `right - left`.
//!
//! ## Usage
//!
//! ```
//! use mecanum_pad::controller::normalizer::{Calibration, InputNormalizer};
//!
//! let mut normalizer = InputNormalizer::new(Calibration::new(32767, 0.3));
//! normalizer.set_stick(None, Some(-32767)); // full forward
//!
//! let intent = normalizer.normalize();
//! assert_eq!(intent.forward, 1.0);
//! assert_eq!(intent.strafe, 0.0);
//! ```

use crate::config::ControllerConfig;

use super::events::{PadEvent, StickAxis, StickRest, Trigger};

/// Deadzone and range for raw samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    raw_max: i32,
    deadzone: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            raw_max: 32767,
            deadzone: 0.3,
        }
    }
}

impl Calibration {
    /// Creates a calibration. `deadzone` is clamped to 0.0..1.0 and a
    /// non-positive `raw_max` is raised to 1.
    #[must_use]
    pub fn new(raw_max: i32, deadzone: f64) -> Self {
        Self {
            raw_max: raw_max.max(1),
            deadzone: deadzone.clamp(0.0, 1.0),
        }
    }

    #[must_use]
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self::new(config.raw_max, config.deadzone)
    }

    #[must_use]
    pub fn raw_max(&self) -> i32 {
        self.raw_max
    }

    #[must_use]
    pub fn deadzone(&self) -> f64 {
        self.deadzone
    }

    /// Maps a raw stick sample to -1..1 with the deadzone applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use mecanum_pad::controller::normalizer::Calibration;
    ///
    /// let cal = Calibration::new(32767, 0.3);
    /// assert_eq!(cal.stick(5000), 0.0);
    /// assert_eq!(cal.stick(32767), 1.0);
    /// assert_eq!(cal.stick(-40000), -1.0);
    /// ```
    #[must_use]
    pub fn stick(&self, raw: i32) -> f64 {
        let raw_max = f64::from(self.raw_max);
        let raw = f64::from(raw);
        if raw.abs() < self.deadzone * raw_max {
            return 0.0;
        }
        (raw / raw_max).clamp(-1.0, 1.0)
    }

    /// Maps a raw trigger sample to 0..1; non-positive samples are 0.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use mecanum_pad::controller::normalizer::Calibration;
    ///
    /// let cal = Calibration::new(32767, 0.3);
    /// assert_eq!(cal.trigger(-32767), 0.0);
    /// assert_eq!(cal.trigger(32767), 1.0);
    /// ```
    #[must_use]
    pub fn trigger(&self, raw: i32) -> f64 {
        if raw <= 0 {
            return 0.0;
        }
        (f64::from(raw) / f64::from(self.raw_max)).clamp(0.0, 1.0)
    }
}

/// Last raw sample of every input feeding the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawInputs {
    pub stick_x: i32,
    pub stick_y: i32,
    pub left_trigger: i32,
    pub right_trigger: i32,
}

/// Continuous drive intent derived from [`RawInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedIntent {
    /// Sideways, positive = right
    pub strafe: f64,
    /// Positive = away from the driver
    pub forward: f64,
    /// Positive = R2 (clockwise)
    pub rotate: f64,
    /// Both triggers engaged: explicit stop gesture
    pub brake: bool,
}

impl NormalizedIntent {
    /// Whether every component differs from `previous` by less than `threshold`.
    #[must_use]
    pub fn within(&self, previous: &NormalizedIntent, threshold: f64) -> bool {
        (self.strafe - previous.strafe).abs() < threshold
            && (self.forward - previous.forward).abs() < threshold
            && (self.rotate - previous.rotate).abs() < threshold
    }
}

/// Pure transform from raw inputs to intent.
#[must_use]
pub fn normalize(raw: &RawInputs, calibration: &Calibration) -> NormalizedIntent {
    let left = calibration.trigger(raw.left_trigger);
    let right = calibration.trigger(raw.right_trigger);

    NormalizedIntent {
        strafe: calibration.stick(raw.stick_x),
        // stick up reads negative
        forward: -calibration.stick(raw.stick_y),
        rotate: right - left,
        brake: left > 0.0 && right > 0.0,
    }
}

/// Holds raw input state and normalizes it on demand.
#[derive(Debug, Clone, Default)]
pub struct InputNormalizer {
    calibration: Calibration,
    raw: RawInputs,
}

impl InputNormalizer {
    #[must_use]
    pub fn new(calibration: Calibration) -> Self {
        Self {
            calibration,
            raw: RawInputs::default(),
        }
    }

    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    #[must_use]
    pub fn raw(&self) -> &RawInputs {
        &self.raw
    }

    /// Updates the given stick axes; `None` leaves an axis unchanged.
    pub fn set_stick(&mut self, x: Option<i32>, y: Option<i32>) {
        if let Some(x) = x {
            self.raw.stick_x = x;
        }
        if let Some(y) = y {
            self.raw.stick_y = y;
        }
    }

    /// Updates the given triggers; `None` leaves a trigger unchanged.
    pub fn set_trigger(&mut self, left: Option<i32>, right: Option<i32>) {
        if let Some(left) = left {
            self.raw.left_trigger = left;
        }
        if let Some(right) = right {
            self.raw.right_trigger = right;
        }
    }

    /// Applies a stick or trigger event to the raw state.
    ///
    /// Returns `false` for events that do not touch the drive inputs (buttons).
    pub fn apply(&mut self, event: &PadEvent) -> bool {
        match *event {
            PadEvent::StickMoved { axis: StickAxis::X, value } => self.set_stick(Some(value), None),
            PadEvent::StickMoved { axis: StickAxis::Y, value } => self.set_stick(None, Some(value)),
            PadEvent::StickAtRest(StickRest::X) => self.set_stick(Some(0), None),
            PadEvent::StickAtRest(StickRest::Y) => self.set_stick(None, Some(0)),
            PadEvent::StickAtRest(StickRest::Both) => self.set_stick(Some(0), Some(0)),
            PadEvent::TriggerPressed { trigger, value } => self.set_one_trigger(trigger, value),
            PadEvent::TriggerReleased(trigger) | PadEvent::TriggerAtRest(trigger) => {
                self.set_one_trigger(trigger, 0)
            }
            PadEvent::ButtonPressed(_) | PadEvent::ButtonReleased(_) => return false,
        }
        true
    }

    fn set_one_trigger(&mut self, trigger: Trigger, value: i32) {
        match trigger {
            Trigger::Left => self.set_trigger(Some(value), None),
            Trigger::Right => self.set_trigger(None, Some(value)),
        }
    }

    /// Current intent for the stored raw state.
    #[must_use]
    pub fn normalize(&self) -> NormalizedIntent {
        normalize(&self.raw, &self.calibration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW_MAX: i32 = 32767;

    fn cal() -> Calibration {
        Calibration::new(RAW_MAX, 0.3)
    }

    // ==================== Calibration Tests ====================

    #[test]
    fn test_new_clamps() {
        let c = Calibration::new(0, 1.5);
        assert_eq!(c.raw_max(), 1);
        assert_eq!(c.deadzone(), 1.0);

        let c = Calibration::new(100, -0.2);
        assert_eq!(c.deadzone(), 0.0);
    }

    #[test]
    fn test_stick_inside_deadzone_is_zero() {
        let cal = cal();
        // 0.3 * 32767 = 9830.1
        for v in [0, 1, -1, 5000, -5000, 9830, -9830] {
            assert_eq!(cal.stick(v), 0.0, "value {}", v);
        }
    }

    #[test]
    fn test_stick_outside_deadzone_is_linear() {
        let cal = cal();
        for v in [9831, -9831, 16384, -20000, 32767, -32767] {
            let expected = (f64::from(v) / f64::from(RAW_MAX)).clamp(-1.0, 1.0);
            assert_eq!(cal.stick(v), expected, "value {}", v);
        }
    }

    #[test]
    fn test_stick_clamps_out_of_range() {
        let cal = cal();
        assert_eq!(cal.stick(i32::MAX), 1.0);
        assert_eq!(cal.stick(i32::MIN), -1.0);
        assert_eq!(cal.stick(-32768), -1.0);
    }

    #[test]
    fn test_zero_deadzone() {
        let cal = Calibration::new(RAW_MAX, 0.0);
        assert!(cal.stick(1) > 0.0);
        assert_eq!(cal.stick(0), 0.0);
    }

    #[test]
    fn test_trigger_non_positive_is_zero() {
        let cal = cal();
        for v in [0, -1, -16000, -32767, i32::MIN] {
            assert_eq!(cal.trigger(v), 0.0, "value {}", v);
        }
    }

    #[test]
    fn test_trigger_monotonic_to_one() {
        let cal = cal();
        let mut last = 0.0;
        for v in (1..=RAW_MAX).step_by(97) {
            let t = cal.trigger(v);
            assert!(t >= last);
            last = t;
        }
        assert_eq!(cal.trigger(RAW_MAX), 1.0);
        assert_eq!(cal.trigger(RAW_MAX + 500), 1.0);
    }

    // ==================== normalize() Tests ====================

    #[test]
    fn test_normalize_rest() {
        let intent = normalize(&RawInputs::default(), &cal());
        assert_eq!(intent, NormalizedIntent::default());
    }

    #[test]
    fn test_normalize_vertical_inverted() {
        let raw = RawInputs {
            stick_y: -RAW_MAX,
            ..RawInputs::default()
        };
        assert_eq!(normalize(&raw, &cal()).forward, 1.0);

        let raw = RawInputs {
            stick_y: 16384,
            ..RawInputs::default()
        };
        assert_eq!(normalize(&raw, &cal()).forward, -(16384.0 / 32767.0));
    }

    #[test]
    fn test_normalize_rotation_from_triggers() {
        let raw = RawInputs {
            right_trigger: RAW_MAX,
            ..RawInputs::default()
        };
        let intent = normalize(&raw, &cal());
        assert_eq!(intent.rotate, 1.0);
        assert!(!intent.brake);

        let raw = RawInputs {
            left_trigger: RAW_MAX,
            right_trigger: -RAW_MAX,
            ..RawInputs::default()
        };
        let intent = normalize(&raw, &cal());
        assert_eq!(intent.rotate, -1.0);
        assert!(!intent.brake);
    }

    #[test]
    fn test_normalize_both_triggers_brake() {
        let raw = RawInputs {
            left_trigger: 100,
            right_trigger: RAW_MAX,
            ..RawInputs::default()
        };
        assert!(normalize(&raw, &cal()).brake);
    }

    #[test]
    fn test_within_threshold() {
        let a = NormalizedIntent {
            strafe: 0.5,
            forward: 0.5,
            rotate: 0.0,
            brake: false,
        };
        let b = NormalizedIntent {
            strafe: 0.55,
            forward: 0.45,
            rotate: 0.09,
            brake: true,
        };
        assert!(b.within(&a, 0.1));

        let c = NormalizedIntent { rotate: 0.1, ..a };
        assert!(!c.within(&a, 0.1));
    }

    // ==================== InputNormalizer Tests ====================

    #[test]
    fn test_set_stick_partial_update() {
        let mut n = InputNormalizer::new(cal());
        n.set_stick(Some(100), Some(200));
        n.set_stick(None, Some(300));
        assert_eq!(n.raw().stick_x, 100);
        assert_eq!(n.raw().stick_y, 300);
    }

    #[test]
    fn test_apply_events() {
        let mut n = InputNormalizer::new(cal());

        assert!(n.apply(&PadEvent::StickMoved { axis: StickAxis::X, value: 20000 }));
        assert!(n.apply(&PadEvent::StickMoved { axis: StickAxis::Y, value: -20000 }));
        assert!(n.apply(&PadEvent::TriggerPressed { trigger: Trigger::Left, value: 1234 }));
        assert!(n.apply(&PadEvent::TriggerPressed { trigger: Trigger::Right, value: 4321 }));
        assert_eq!(
            *n.raw(),
            RawInputs {
                stick_x: 20000,
                stick_y: -20000,
                left_trigger: 1234,
                right_trigger: 4321,
            }
        );

        assert!(n.apply(&PadEvent::StickAtRest(StickRest::X)));
        assert_eq!(n.raw().stick_x, 0);
        assert_eq!(n.raw().stick_y, -20000);

        assert!(n.apply(&PadEvent::StickAtRest(StickRest::Both)));
        assert_eq!(n.raw().stick_y, 0);

        assert!(n.apply(&PadEvent::TriggerReleased(Trigger::Left)));
        assert!(n.apply(&PadEvent::TriggerAtRest(Trigger::Right)));
        assert_eq!(*n.raw(), RawInputs::default());
    }

    #[test]
    fn test_apply_ignores_buttons() {
        use crate::controller::events::Button;

        let mut n = InputNormalizer::new(cal());
        assert!(!n.apply(&PadEvent::ButtonPressed(Button::Options)));
        assert!(!n.apply(&PadEvent::ButtonReleased(Button::Share)));
        assert_eq!(*n.raw(), RawInputs::default());
    }

    #[test]
    fn test_full_forward_scenario() {
        let mut n = InputNormalizer::new(cal());
        n.set_stick(Some(0), Some(-32767));
        let intent = n.normalize();
        assert_eq!((intent.strafe, intent.forward, intent.rotate), (0.0, 1.0, 0.0));
    }
}
