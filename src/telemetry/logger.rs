//! Append-only telemetry file.
//!
//! Lines go through a `tracing-appender` non-blocking writer, so recording
//! never waits on disk I/O. Keep the returned [`WorkerGuard`] alive until
//! shutdown; dropping it flushes pending lines.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::{debug, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};

use crate::config::TelemetryFormat;
use crate::error::Result;

use super::types::WheelRecord;
use super::TelemetrySink;

/// File-backed [`TelemetrySink`].
pub struct FileTelemetry {
    writer: NonBlocking,
    format: TelemetryFormat,
    records: u64,
}

impl std::fmt::Debug for FileTelemetry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTelemetry")
            .field("format", &self.format)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl FileTelemetry {
    /// Open (or create) `path` for appending.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mecanum_pad::config::TelemetryFormat;
    /// use mecanum_pad::telemetry::logger::FileTelemetry;
    ///
    /// let (sink, _guard) = FileTelemetry::open("wheel_speed.log", TelemetryFormat::Text)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P, format: TelemetryFormat) -> Result<(Self, WorkerGuard)> {
        let path = path.as_ref();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);

        debug!("Telemetry log opened at {}", path.display());

        Ok((
            Self {
                writer,
                format,
                records: 0,
            },
            guard,
        ))
    }

    /// Number of records written so far.
    pub fn records(&self) -> u64 {
        self.records
    }
}

impl TelemetrySink for FileTelemetry {
    fn record(&mut self, record: &WheelRecord) {
        let line = match self.format {
            TelemetryFormat::Text => record.to_text_line(),
            TelemetryFormat::Jsonl => match record.to_json_line() {
                Ok(line) => line,
                Err(e) => {
                    warn!("Failed to serialize telemetry record: {}", e);
                    return;
                }
            },
        };

        if let Err(e) = writeln!(self.writer, "{}", line) {
            warn!("Failed to write telemetry record: {}", e);
            return;
        }
        self.records += 1;
    }
}
