//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all, via
//! [`Config::default`]) yields the stock robot setup.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

use crate::drive::wheels::{WheelConfig, Wheels};
use crate::error::{MecanumPadError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ControllerConfig {
    #[serde(default = "default_device_path")]
    pub device_path: String,

    #[serde(default = "default_connect_timeout_s")]
    pub connect_timeout_s: u64,

    #[serde(default = "default_raw_max")]
    pub raw_max: i32,

    #[serde(default = "default_deadzone")]
    pub deadzone: f64,

    #[serde(default = "default_axis_min")]
    pub axis_min: i32,

    #[serde(default = "default_axis_max")]
    pub axis_max: i32,
}

/// Drive configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DriveConfig {
    #[serde(default = "default_max_duty")]
    pub max_duty: i32,

    #[serde(default = "default_min_change")]
    pub min_change: f64,

    /// Wheels left out of `[drive.wheels]` keep their default wiring
    #[serde(default = "default_wheels", deserialize_with = "deserialize_wheels")]
    pub wheels: Wheels<WheelConfig>,
}

/// Motor board serial configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    #[serde(default = "default_board_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Telemetry line format
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TelemetryFormat {
    /// Human readable `norm ... duty ...` lines
    Text,
    /// One JSON object per line
    Jsonl,
}

/// Telemetry configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub log_path: String,

    #[serde(default = "default_log_format")]
    pub format: TelemetryFormat,
}

// Default value functions
fn default_device_path() -> String { "/dev/input/event0".to_string() }
fn default_connect_timeout_s() -> u64 { 60 }
fn default_raw_max() -> i32 { 32767 }
fn default_deadzone() -> f64 { 0.3 }
fn default_axis_min() -> i32 { 0 }
fn default_axis_max() -> i32 { 255 }

fn default_max_duty() -> i32 { 70 }
fn default_min_change() -> f64 { 0.1 }
fn default_wheels() -> Wheels<WheelConfig> {
    Wheels {
        front_left: WheelConfig { port: 4, sign: -1 },
        front_right: WheelConfig { port: 1, sign: 1 },
        rear_left: WheelConfig { port: 2, sign: -1 },
        rear_right: WheelConfig { port: 3, sign: 1 },
    }
}

fn deserialize_wheels<'de, D>(deserializer: D) -> std::result::Result<Wheels<WheelConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = Wheels::<Option<WheelConfig>>::deserialize(deserializer)?;
    Ok(overrides.zip_with(default_wheels(), |wheel, default| wheel.unwrap_or(default)))
}

fn default_board_port() -> String { "/dev/ttyAMA0".to_string() }
fn default_baud_rate() -> u32 { 1_000_000 }

fn default_telemetry_enabled() -> bool { true }
fn default_log_path() -> String { "./wheel_speed_normalized.log".to_string() }
fn default_log_format() -> TelemetryFormat { TelemetryFormat::Text }

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device_path: default_device_path(),
            connect_timeout_s: default_connect_timeout_s(),
            raw_max: default_raw_max(),
            deadzone: default_deadzone(),
            axis_min: default_axis_min(),
            axis_max: default_axis_max(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_duty: default_max_duty(),
            min_change: default_min_change(),
            wheels: default_wheels(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            port: default_board_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_telemetry_enabled(),
            log_path: default_log_path(),
            format: default_log_format(),
        }
    }
}

fn invalid(msg: impl std::fmt::Display) -> MecanumPadError {
    MecanumPadError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mecanum_pad::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        let controller = &self.controller;

        if controller.device_path.is_empty() {
            return Err(invalid("controller device_path cannot be empty"));
        }

        if controller.connect_timeout_s == 0 || controller.connect_timeout_s > 3600 {
            return Err(invalid("connect_timeout_s must be between 1 and 3600"));
        }

        if controller.raw_max <= 0 {
            return Err(invalid("raw_max must be greater than 0"));
        }

        if !(0.0..1.0).contains(&controller.deadzone) {
            return Err(invalid("deadzone must be in [0.0, 1.0)"));
        }

        if controller.axis_min >= controller.axis_max {
            return Err(invalid("axis_min must be less than axis_max"));
        }

        let drive = &self.drive;

        // The board accepts duties in -100..=100
        if drive.max_duty <= 0 || drive.max_duty > 100 {
            return Err(invalid("max_duty must be between 1 and 100"));
        }

        if !(0.0..=1.0).contains(&drive.min_change) {
            return Err(invalid("min_change must be between 0.0 and 1.0"));
        }

        let mut seen_ports = Vec::with_capacity(4);
        for (name, wheel) in drive.wheels.named() {
            if wheel.sign != 1 && wheel.sign != -1 {
                return Err(invalid(format!("{} sign must be 1 or -1", name)));
            }
            if !(1..=4).contains(&wheel.port) {
                return Err(invalid(format!("{} port must be between 1 and 4", name)));
            }
            if seen_ports.contains(&wheel.port) {
                return Err(invalid(format!("{} port {} is assigned twice", name, wheel.port)));
            }
            seen_ports.push(wheel.port);
        }

        if self.board.port.is_empty() {
            return Err(invalid("board port cannot be empty"));
        }

        if ![115200, 230400, 460800, 921600, 1_000_000].contains(&self.board.baud_rate) {
            return Err(invalid(
                "baud_rate must be one of: 115200, 230400, 460800, 921600, 1000000",
            ));
        }

        if self.telemetry.enabled && self.telemetry.log_path.is_empty() {
            return Err(invalid("telemetry log_path cannot be empty when enabled"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_default_config() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[controller]
device_path = "/dev/input/event7"
deadzone = 0.2

[drive]
max_duty = 50

[drive.wheels.front_left]
port = 4
sign = 1

[board]
port = "/dev/ttyUSB0"

[telemetry]
format = "jsonl"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.controller.device_path, "/dev/input/event7");
        assert_eq!(config.controller.deadzone, 0.2);
        assert_eq!(config.controller.raw_max, 32767);
        assert_eq!(config.drive.max_duty, 50);
        assert_eq!(config.drive.wheels.front_left.sign, 1);
        assert_eq!(config.board.port, "/dev/ttyUSB0");
        assert_eq!(config.telemetry.format, TelemetryFormat::Jsonl);
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.drive.max_duty, 70);
        assert_eq!(config.drive.wheels.rear_left.port, 2);
        assert_eq!(config.telemetry.format, TelemetryFormat::Text);
    }

    #[test]
    fn test_partial_wheel_table_keeps_other_defaults() {
        let config: Config = toml::from_str("[drive.wheels.front_left]\nport = 4\nsign = 1\n").unwrap();

        assert_eq!(config.drive.wheels.front_left, WheelConfig { port: 4, sign: 1 });
        assert_eq!(config.drive.wheels.front_right, WheelConfig { port: 1, sign: 1 });
        assert_eq!(config.drive.wheels.rear_left, WheelConfig { port: 2, sign: -1 });
        assert_eq!(config.drive.wheels.rear_right, WheelConfig { port: 3, sign: 1 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_wheel_override_can_collide() {
        use std::io::Write;

        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[drive.wheels.rear_right]\nport = 1\nsign = 1\n")
            .unwrap();

        // rear_right now shares port 1 with the default front_right
        assert!(Config::load(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/mecanum-pad.toml");
        assert!(matches!(result, Err(MecanumPadError::Io(_))));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[telemetry]\nformat = \"csv\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_device_path() {
        let mut config = create_valid_config();
        config.controller.device_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connect_timeout_bounds() {
        let mut config = create_valid_config();
        config.controller.connect_timeout_s = 0;
        assert!(config.validate().is_err());

        config.controller.connect_timeout_s = 3601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_raw_max_zero() {
        let mut config = create_valid_config();
        config.controller.raw_max = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_bounds() {
        let mut config = create_valid_config();
        config.controller.deadzone = -0.1;
        assert!(config.validate().is_err());

        config.controller.deadzone = 1.0;
        assert!(config.validate().is_err());

        config.controller.deadzone = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_axis_range_inverted() {
        let mut config = create_valid_config();
        config.controller.axis_min = 255;
        config.controller.axis_max = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_duty_bounds() {
        let mut config = create_valid_config();
        config.drive.max_duty = 0;
        assert!(config.validate().is_err());

        config.drive.max_duty = 101;
        assert!(config.validate().is_err());

        config.drive.max_duty = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_change_negative() {
        let mut config = create_valid_config();
        config.drive.min_change = -0.01;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wheel_sign_invalid() {
        let mut config = create_valid_config();
        config.drive.wheels.rear_right.sign = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wheel_port_out_of_range() {
        let mut config = create_valid_config();
        config.drive.wheels.front_right.port = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wheel_port_duplicate() {
        let mut config = create_valid_config();
        config.drive.wheels.front_right.port = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_board_port() {
        let mut config = create_valid_config();
        config.board.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = create_valid_config();
        config.board.baud_rate = 9600;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_path_when_enabled() {
        let mut config = create_valid_config();
        config.telemetry.log_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_path_when_disabled() {
        let mut config = create_valid_config();
        config.telemetry.enabled = false;
        config.telemetry.log_path = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_raw_max(), 32767);
        assert_eq!(default_deadzone(), 0.3);
        assert_eq!(default_max_duty(), 70);
        assert_eq!(default_min_change(), 0.1);
        assert_eq!(default_connect_timeout_s(), 60);
        assert_eq!(default_baud_rate(), 1_000_000);

        let wheels = default_wheels();
        assert_eq!(wheels.front_left, WheelConfig { port: 4, sign: -1 });
        assert_eq!(wheels.front_right, WheelConfig { port: 1, sign: 1 });
        assert_eq!(wheels.rear_left, WheelConfig { port: 2, sign: -1 });
        assert_eq!(wheels.rear_right, WheelConfig { port: 3, sign: 1 });
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml");
        let config = Config::load(path).unwrap();
        let defaults = Config::default();

        assert_eq!(config.controller.device_path, defaults.controller.device_path);
        assert_eq!(config.controller.axis_max, defaults.controller.axis_max);
        assert_eq!(config.controller.deadzone, defaults.controller.deadzone);
        assert_eq!(config.drive.max_duty, defaults.drive.max_duty);
        assert_eq!(config.drive.wheels, defaults.drive.wheels);
        assert_eq!(config.board.port, defaults.board.port);
        assert_eq!(config.board.baud_rate, defaults.board.baud_rate);
        assert_eq!(config.telemetry.log_path, defaults.telemetry.log_path);
        assert_eq!(config.telemetry.format, defaults.telemetry.format);
    }
}
