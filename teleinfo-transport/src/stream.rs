//! Line source trait for the transport layer

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::time::Duration;
use teleinfo_core::{TeleinfoError, TeleinfoResult};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Line delimiter used by Teleinfo meters
pub const DEFAULT_DELIMITER: u8 = b'\n';

/// Longest accepted line, delimiter included
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

const READ_CHUNK_SIZE: usize = 1024;

/// Line source interface to access a stream coming from a meter
///
/// The frame reader only needs "a stream yielding delimiter-terminated
/// lines"; how the underlying channel was opened and configured is up to the
/// implementation.
#[async_trait]
pub trait LineSource: Send {
    /// Read the next raw line from the stream
    ///
    /// # Returns
    ///
    /// The line bytes including the delimiter, or `None` at end of stream.
    /// The last line may lack its delimiter if the stream ended mid-line.
    ///
    /// # Errors
    ///
    /// - `Decode` for a line that had to be dropped; the stream is still usable
    /// - `Timeout`, `Connection` or `StreamClosed` for stream-level failures
    async fn read_line(&mut self) -> TeleinfoResult<Option<Bytes>>;

    /// Check if the stream is closed
    fn is_closed(&self) -> bool;

    /// Close the stream, releasing the underlying handle
    ///
    /// Closing an already closed stream is a no-op.
    async fn close(&mut self) -> TeleinfoResult<()>;
}

/// Line transport settings
#[derive(Debug, Clone)]
pub struct LineSettings {
    pub delimiter: u8,
    /// Longest accepted line, delimiter included
    pub max_line_length: usize,
    /// Read timeout. `None` blocks until the next line arrives.
    pub read_timeout: Option<Duration>,
}

impl LineSettings {
    /// Create settings with default parameters
    ///
    /// # Defaults
    /// - Delimiter: `\n`
    /// - Max line length: 64 KiB
    /// - Read timeout: none
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Set the read timeout
    ///
    /// # Arguments
    /// * `timeout` - Longest wait for the stream to yield more bytes. Expiry
    ///   keeps the bytes received so far; the line is completed by a later read.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            read_timeout: None,
        }
    }
}

/// Line transport over any async byte stream
///
/// Bytes are accumulated in a buffer owned by the transport, so a read that
/// is cancelled or times out never loses the start of a line.
///
/// # Why not `read_until`?
/// `AsyncBufReadExt::read_until` is not cancel safe: bytes it already moved
/// into the caller's buffer are lost when the future is dropped, and the next
/// call would return the tail of the line as if it were a whole line.
/// `read_buf` only appends to the buffer when a read completes.
pub struct LineTransport<R> {
    stream: Option<R>,
    buffer: BytesMut,
    settings: LineSettings,
    /// Dropping the remainder of an overlong line
    discarding: bool,
    closed: bool,
}

impl<R> fmt::Debug for LineTransport<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineTransport")
            .field("settings", &self.settings)
            .field("buffered", &self.buffer.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl<R: AsyncRead + Unpin + Send> LineTransport<R> {
    /// Wrap an open stream with default settings
    ///
    /// # Arguments
    /// * `stream` - An open, already configured byte stream (e.g. a serial
    ///   port at 1200 baud, 7E1)
    pub fn new(stream: R) -> Self {
        Self::with_settings(stream, LineSettings::default())
    }

    pub fn with_settings(stream: R, settings: LineSettings) -> Self {
        Self {
            stream: Some(stream),
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            settings,
            discarding: false,
            closed: false,
        }
    }

    pub fn settings(&self) -> &LineSettings {
        &self.settings
    }

    fn overlong(&self) -> TeleinfoError {
        TeleinfoError::Decode(format!(
            "line exceeds {} bytes",
            self.settings.max_line_length
        ))
    }
}

#[async_trait]
impl<R: AsyncRead + Unpin + Send> LineSource for LineTransport<R> {
    async fn read_line(&mut self) -> TeleinfoResult<Option<Bytes>> {
        let delimiter = self.settings.delimiter;
        let max_line_length = self.settings.max_line_length;
        let timeout = self.settings.read_timeout;

        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == delimiter) {
                let line = self.buffer.split_to(pos + 1).freeze();
                if std::mem::take(&mut self.discarding) {
                    continue;
                }
                if line.len() > max_line_length {
                    return Err(self.overlong());
                }
                return Ok(Some(line));
            }

            if self.discarding {
                self.buffer.clear();
            } else if self.buffer.len() > max_line_length {
                self.buffer.clear();
                self.discarding = true;
                return Err(self.overlong());
            }

            let stream = self.stream.as_mut().ok_or(TeleinfoError::StreamClosed)?;
            self.buffer.reserve(READ_CHUNK_SIZE);

            let result = if let Some(timeout) = timeout {
                tokio::time::timeout(timeout, stream.read_buf(&mut self.buffer))
                    .await
                    .map_err(|_| TeleinfoError::Timeout)?
            } else {
                stream.read_buf(&mut self.buffer).await
            };

            match result {
                Ok(0) => {
                    self.closed = true;
                    if self.buffer.is_empty() || std::mem::take(&mut self.discarding) {
                        self.buffer.clear();
                        return Ok(None);
                    }
                    return Ok(Some(self.buffer.split().freeze()));
                }
                Ok(_) => {}
                Err(e) => {
                    self.closed = true;
                    return Err(TeleinfoError::Connection(e));
                }
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    async fn close(&mut self) -> TeleinfoResult<()> {
        self.stream.take();
        self.buffer.clear();
        self.closed = true;
        Ok(())
    }
}
