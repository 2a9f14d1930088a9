//! Per-wheel containers for the four mecanum wheels.

use serde::{Deserialize, Serialize};

/// One value per wheel, in dispatch order FL, FR, RL, RR.
///
/// A wheel missing from a deserialized table takes `T::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Wheels<T> {
    #[serde(default)]
    pub front_left: T,
    #[serde(default)]
    pub front_right: T,
    #[serde(default)]
    pub rear_left: T,
    #[serde(default)]
    pub rear_right: T,
}

impl<T: Copy> Wheels<T> {
    /// Same value on every wheel.
    pub fn splat(value: T) -> Self {
        Self {
            front_left: value,
            front_right: value,
            rear_left: value,
            rear_right: value,
        }
    }

    /// Returns values as array [front_left, front_right, rear_left, rear_right]
    pub fn as_array(&self) -> [T; 4] {
        [self.front_left, self.front_right, self.rear_left, self.rear_right]
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Wheels<U> {
        Wheels {
            front_left: f(self.front_left),
            front_right: f(self.front_right),
            rear_left: f(self.rear_left),
            rear_right: f(self.rear_right),
        }
    }

    /// Combines two per-wheel sets wheel by wheel.
    pub fn zip_with<U: Copy, V>(self, other: Wheels<U>, mut f: impl FnMut(T, U) -> V) -> Wheels<V> {
        Wheels {
            front_left: f(self.front_left, other.front_left),
            front_right: f(self.front_right, other.front_right),
            rear_left: f(self.rear_left, other.rear_left),
            rear_right: f(self.rear_right, other.rear_right),
        }
    }

    /// Values paired with the wheel's config name.
    pub fn named(&self) -> [(&'static str, T); 4] {
        [
            ("front_left", self.front_left),
            ("front_right", self.front_right),
            ("rear_left", self.rear_left),
            ("rear_right", self.rear_right),
        ]
    }
}

/// Hardware wiring of a single wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WheelConfig {
    /// Motor board port (1-4)
    pub port: u8,
    /// +1 or -1 to correct motor mounting/wiring direction
    pub sign: i8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_array_order() {
        let wheels = Wheels {
            front_left: 1,
            front_right: 2,
            rear_left: 3,
            rear_right: 4,
        };
        assert_eq!(wheels.as_array(), [1, 2, 3, 4]);
    }

    #[test]
    fn test_zip_with() {
        let a = Wheels::splat(2.0);
        let b = Wheels {
            front_left: -1,
            front_right: 1,
            rear_left: -1,
            rear_right: 1,
        };
        let out = a.zip_with(b, |v, s| v * f64::from(s));
        assert_eq!(out.as_array(), [-2.0, 2.0, -2.0, 2.0]);
    }

    #[test]
    fn test_missing_wheels_take_default() {
        let wheels: Wheels<Option<WheelConfig>> =
            toml::from_str("[rear_left]\nport = 2\nsign = -1\n").unwrap();
        assert_eq!(wheels.rear_left, Some(WheelConfig { port: 2, sign: -1 }));
        assert_eq!(wheels.front_left, None);
        assert_eq!(wheels.rear_right, None);
    }

    #[test]
    fn test_named() {
        let names: Vec<_> = Wheels::splat(0).named().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["front_left", "front_right", "rear_left", "rear_right"]);
    }
}
