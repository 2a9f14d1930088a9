//! # Telemetry Module
//!
//! Append-only log of every dispatched wheel duty change.
//!
//! This module handles:
//! - The [`TelemetrySink`] seam the mixer records through
//! - Text and JSONL line formats
//! - Non-blocking file output

pub mod logger;
pub mod types;

pub use types::WheelRecord;

use tracing_appender::non_blocking::WorkerGuard;

use crate::config::TelemetryConfig;
use crate::error::Result;

use logger::FileTelemetry;

/// Receives one record per dispatched duty change.
///
/// Recording is best effort: implementations log their own failures and
/// must not block.
pub trait TelemetrySink {
    fn record(&mut self, record: &WheelRecord);
}

impl<T: TelemetrySink + ?Sized> TelemetrySink for Box<T> {
    fn record(&mut self, record: &WheelRecord) {
        (**self).record(record)
    }
}

/// Sink used when telemetry is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl TelemetrySink for NullTelemetry {
    fn record(&mut self, _record: &WheelRecord) {}
}

/// Build the sink described by `config`.
///
/// The guard, when present, must outlive the sink; dropping it flushes the file.
///
/// # Errors
///
/// Returns `Io` if the telemetry file cannot be opened.
pub fn open_sink(
    config: &TelemetryConfig,
) -> Result<(Box<dyn TelemetrySink + Send>, Option<WorkerGuard>)> {
    if !config.enabled {
        return Ok((Box::new(NullTelemetry), None));
    }

    let (sink, guard) = FileTelemetry::open(&config.log_path, config.format)?;
    Ok((Box::new(sink), Some(guard)))
}
