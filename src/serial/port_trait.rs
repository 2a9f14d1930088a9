//! Byte sink abstraction over the board's serial port, so the writer task
//! can be driven against an in-memory port in tests.

use async_trait::async_trait;
use std::io;
use tokio::io::AsyncWriteExt;

/// Write side of a serial link
#[async_trait]
pub trait SerialPortIO: Send {
    /// Write a whole frame
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Push buffered bytes out to the wire
    async fn flush(&mut self) -> io::Result<()>;
}

/// [`SerialPortIO`] over an opened `tokio_serial` stream
pub struct TokioSerialPort {
    stream: tokio_serial::SerialStream,
}

impl TokioSerialPort {
    pub fn new(stream: tokio_serial::SerialStream) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl SerialPortIO for TokioSerialPort {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        AsyncWriteExt::write_all(&mut self.stream, data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        AsyncWriteExt::flush(&mut self.stream).await
    }
}
