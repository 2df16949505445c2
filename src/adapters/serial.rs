//! Serial line reader.
//!
//! `SerialLineReader` turns any byte stream into decoded, trimmed lines. The
//! real device is a `Box<dyn SerialPort>` opened by [`SerialPortOpener`]; tests
//! feed it in-memory readers.

use crate::config::SerialSettings;
use crate::core::{LineRead, LineSource, SerialLine, SourceOpener};
use crate::utils::error::{BridgeError, Result};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 256;
/// Reads attempted per pull before handing control back as `Idle`.
const MAX_READS_PER_PULL: usize = 8;
pub const DEFAULT_MAX_LINE_BYTES: usize = 1024;

pub struct SerialLineReader<R: Read> {
    inner: R,
    device: String,
    pending: Vec<u8>,
    /// Prefix of `pending` already searched for a newline.
    scanned: usize,
    max_line_bytes: usize,
    /// Set after an overlong line was dropped; bytes are skipped up to the next newline.
    discarding: bool,
    eof: bool,
}

impl<R: Read> SerialLineReader<R> {
    pub fn new(inner: R, device: impl Into<String>) -> Self {
        Self::with_max_line_bytes(inner, device, DEFAULT_MAX_LINE_BYTES)
    }

    pub fn with_max_line_bytes(inner: R, device: impl Into<String>, max_line_bytes: usize) -> Self {
        Self {
            inner,
            device: device.into(),
            pending: Vec::new(),
            scanned: 0,
            max_line_bytes,
            discarding: false,
            eof: false,
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        match self.pending[self.scanned..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let newline = self.scanned + offset;
                let mut line: Vec<u8> = self.pending.drain(..=newline).collect();
                line.pop();
                self.scanned = 0;
                Some(line)
            }
            None => {
                self.scanned = self.pending.len();
                None
            }
        }
    }

    fn clear_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.scanned = 0;
        dropped
    }

    fn too_long(&self, byte_count: usize) -> BridgeError {
        BridgeError::LineTooLong {
            byte_count,
            limit: self.max_line_bytes,
        }
    }

    fn decode(&self, bytes: Vec<u8>) -> Result<LineRead> {
        let byte_count = bytes.len();
        if byte_count > self.max_line_bytes {
            return Err(self.too_long(byte_count));
        }
        String::from_utf8(bytes)
            .map(|text| LineRead::Line(SerialLine::new(&text)))
            .map_err(|source| BridgeError::DecodeError { byte_count, source })
    }
}

impl<R: Read + Send> LineSource for SerialLineReader<R> {
    fn next_line(&mut self) -> Result<LineRead> {
        for _ in 0..MAX_READS_PER_PULL {
            if let Some(bytes) = self.take_line() {
                if self.discarding {
                    // tail of a line already reported as too long
                    self.discarding = false;
                    continue;
                }
                return self.decode(bytes);
            }

            if self.pending.len() > self.max_line_bytes {
                let dropped = self.clear_pending();
                if !self.discarding {
                    self.discarding = true;
                    return Err(self.too_long(dropped));
                }
            }

            if self.eof {
                if self.pending.is_empty() || self.discarding {
                    self.clear_pending();
                    self.discarding = false;
                    return Ok(LineRead::Closed);
                }
                // unterminated tail before EOF
                let tail = std::mem::take(&mut self.pending);
                self.scanned = 0;
                return self.decode(tail);
            }

            let mut chunk = [0u8; READ_CHUNK];
            match self.inner.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(LineRead::Idle);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(BridgeError::SerialLinkError {
                        message: format!("read from {} failed: {}", self.device, e),
                    });
                }
            }
        }

        // still mid-line; let the caller check for shutdown before reading on
        Ok(LineRead::Idle)
    }
}

impl<R: Read> Drop for SerialLineReader<R> {
    fn drop(&mut self) {
        tracing::info!("🔌 Serial connection to {} closed", self.device);
    }
}

/// Opens real serial devices, 8N1 without flow control.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialPortOpener;

impl SourceOpener for SerialPortOpener {
    type Source = SerialLineReader<Box<dyn SerialPort>>;

    fn open(&self, device: &str, settings: &SerialSettings) -> Result<Self::Source> {
        let port = serialport::new(device, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(settings.read_timeout())
            .open()
            .map_err(|source| BridgeError::SerialOpenError {
                port: device.to_string(),
                source,
            })?;

        // Drop whatever the OS buffered before we attached.
        port.clear(ClearBuffer::Input)
            .map_err(|source| BridgeError::SerialOpenError {
                port: device.to_string(),
                source,
            })?;

        tracing::debug!(
            "Opened {} at {} baud, read timeout {:?}",
            device,
            settings.baud_rate,
            settings.read_timeout()
        );

        Ok(SerialLineReader::with_max_line_bytes(
            port,
            device,
            settings.max_line_bytes,
        ))
    }
}
