//! Telemetry record types and their line formats.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::drive::wheels::Wheels;

/// Timestamp layout of text lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One dispatched duty change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WheelRecord {
    pub timestamp: DateTime<Local>,
    /// Saturation-normalized wheel values (-1..1, before sign correction)
    pub normalized: Wheels<f64>,
    /// Final signed duties as sent to the board
    pub duties: Wheels<i32>,
}

impl WheelRecord {
    #[must_use]
    pub fn new(normalized: Wheels<f64>, duties: Wheels<i32>) -> Self {
        Self {
            timestamp: Local::now(),
            normalized,
            duties,
        }
    }

    /// Human readable line, without trailing newline.
    ///
    /// ```text
    /// 2024-05-01 12:00:00 norm FL=1.000 FR=1.000 RL=1.000 RR=1.000 duty FL=-70 FR=70 RL=-70 RR=70
    /// ```
    #[must_use]
    pub fn to_text_line(&self) -> String {
        let n = &self.normalized;
        let d = &self.duties;
        format!(
            "{} norm FL={:.3} FR={:.3} RL={:.3} RR={:.3} duty FL={} FR={} RL={} RR={}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            n.front_left,
            n.front_right,
            n.rear_left,
            n.rear_right,
            d.front_left,
            d.front_right,
            d.rear_left,
            d.rear_right,
        )
    }

    /// JSON object line, without trailing newline.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` serialization failures.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> WheelRecord {
        WheelRecord {
            timestamp: Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap(),
            normalized: Wheels {
                front_left: 0.5,
                front_right: -0.25,
                rear_left: 1.0,
                rear_right: 0.0004,
            },
            duties: Wheels {
                front_left: -35,
                front_right: -17,
                rear_left: -70,
                rear_right: 0,
            },
        }
    }

    #[test]
    fn test_text_line() {
        assert_eq!(
            record().to_text_line(),
            "2024-05-01 12:30:05 norm FL=0.500 FR=-0.250 RL=1.000 RR=0.000 \
             duty FL=-35 FR=-17 RL=-70 RR=0"
        );
    }

    #[test]
    fn test_json_line() {
        let line = record().to_json_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["normalized"]["front_left"], 0.5);
        assert_eq!(value["duties"]["rear_left"], -70);
        assert!(value["timestamp"].as_str().unwrap().starts_with("2024-05-01T12:30:05"));
        assert!(!line.contains('\n'));
    }
}
