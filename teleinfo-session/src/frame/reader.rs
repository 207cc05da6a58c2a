//! Teleinfo frame reader

use crate::frame::decoder::FieldDecoder;
use crate::frame::state::{LineKind, ReaderState};
use crate::frame::statistics::ReaderStatistics;
use teleinfo_core::{SensorConfig, Snapshot, TeleinfoError, TeleinfoResult};
use teleinfo_transport::LineSource;

/// Decode a raw line as ASCII, dropping every CR and LF
///
/// # Errors
/// `Decode` if any byte is outside the ASCII range.
pub fn decode_ascii(raw: &[u8]) -> TeleinfoResult<String> {
    if let Some(pos) = raw.iter().position(|b| !b.is_ascii()) {
        return Err(TeleinfoError::Decode(format!(
            "non-ASCII byte 0x{:02X} at offset {}",
            raw[pos], pos
        )));
    }

    Ok(raw
        .iter()
        .filter(|&&b| b != b'\r' && b != b'\n')
        .map(|&b| char::from(b))
        .collect())
}

/// Frame reader
///
/// Pulls lines from a [`LineSource`], drives the [`ReaderState`] machine and
/// feeds interior lines to a [`FieldDecoder`]. The snapshot persists across
/// frames.
pub struct FrameReader<S> {
    source: S,
    state: ReaderState,
    decoder: FieldDecoder,
    statistics: ReaderStatistics,
    /// Pending warm-up discard
    warm_up: bool,
}

impl<S: LineSource> FrameReader<S> {
    /// Create a frame reader with default configuration
    pub fn new(source: S) -> Self {
        Self::from_config(source, &SensorConfig::default())
    }

    pub fn from_config(source: S, config: &SensorConfig) -> Self {
        Self {
            source,
            state: ReaderState::default(),
            decoder: FieldDecoder::with_primary_label(config.primary_label.clone()),
            statistics: ReaderStatistics::new(),
            warm_up: config.discard_first_line,
        }
    }

    /// Seed the working snapshot, e.g. with the one published by a previous
    /// reader on the same meter
    pub fn with_snapshot(mut self, snapshot: Snapshot) -> Self {
        self.decoder = self.decoder.with_snapshot(snapshot);
        self
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn snapshot(&self) -> &Snapshot {
        self.decoder.snapshot()
    }

    pub fn statistics(&self) -> &ReaderStatistics {
        &self.statistics
    }

    /// Discard the first line handed over by the driver
    async fn warm_up(&mut self) -> TeleinfoResult<()> {
        if !self.warm_up {
            return Ok(());
        }
        self.warm_up = false;

        let line = self.source.read_line().await?.ok_or(TeleinfoError::StreamClosed)?;
        self.statistics.increment_lines_read();
        log::debug!("Discarded warm-up line ({} bytes)", line.len());
        Ok(())
    }

    /// Read the next line and decode it as ASCII
    ///
    /// Performs the warm-up discard on first use.
    ///
    /// # Errors
    /// - `Decode` if the line is not ASCII; the stream is still usable
    /// - `StreamClosed` at end of stream, or any transport error
    pub async fn read_next_line(&mut self) -> TeleinfoResult<String> {
        self.warm_up().await?;

        let raw = self.source.read_line().await?.ok_or(TeleinfoError::StreamClosed)?;
        self.statistics.increment_lines_read();
        decode_ascii(&raw)
    }

    /// Classify a decoded line and act on it
    ///
    /// # Arguments
    /// * `line` - A line already stripped of CR and LF
    ///
    /// # Returns
    /// The line's kind; `LineKind::FrameEnd` means a frame was just closed.
    ///
    /// Malformed lines and bad counter values are counted and logged here,
    /// never returned.
    pub fn process_line(&mut self, line: &str) -> LineKind {
        let kind = self.state.classify(line);

        match kind {
            LineKind::FrameStart => log::debug!("Start frame"),
            LineKind::Measurement => self.handle_measurement(line),
            LineKind::FrameEnd => {
                self.statistics.increment_frames_completed();
                log::debug!("End frame");
            }
            LineKind::Ignored => self.statistics.increment_ignored_lines(),
        }

        self.state = self.state.next(kind);
        kind
    }

    fn handle_measurement(&mut self, line: &str) {
        let measurement = match FieldDecoder::decode_line(line) {
            Ok(m) => m,
            Err(e) => {
                self.statistics.increment_malformed_lines();
                log::warn!("Skipping line: {}", e);
                return;
            }
        };

        log::debug!("Got: [{}] = ({})", measurement.label, measurement.value);
        self.statistics.increment_measurements_applied();

        if let Err(e) = self.decoder.apply(measurement) {
            self.statistics.increment_invalid_counters();
            log::warn!("Primary counter unchanged: {}", e);
        }
    }

    /// Read lines until a frame closes
    ///
    /// Per-line errors are logged and skipped. Lines of a frame that is still
    /// open when the returned future is dropped stay applied to the working
    /// snapshot but are never returned.
    ///
    /// # Returns
    /// A copy of the snapshot as of the frame's closure
    ///
    /// # Errors
    /// Stream-level failures only (`StreamClosed`, `Connection`, `Timeout`).
    /// After a `Timeout` the reader keeps its state and any partial line, so
    /// calling `next_frame` again continues the same frame.
    ///
    /// # Why copy the snapshot?
    /// The working snapshot keeps changing as the next frame is read. Handing
    /// out a copy taken at frame closure means a caller never sees a frame
    /// half applied.
    pub async fn next_frame(&mut self) -> TeleinfoResult<Snapshot> {
        loop {
            let line = match self.read_next_line().await {
                Ok(line) => line,
                Err(e) if e.is_recoverable() => {
                    self.statistics.increment_decode_errors();
                    log::warn!("Skipping line: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            if self.process_line(&line) == LineKind::FrameEnd {
                return Ok(self.decoder.snapshot().clone());
            }
        }
    }

    /// Close the underlying line source
    pub async fn close(&mut self) -> TeleinfoResult<()> {
        self.source.close().await
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use teleinfo_transport::{LineSettings, LineTransport};
    use tokio::io::AsyncWriteExt;
    use tokio_test::io::Builder;

    const SCENARIO: &[u8] = b"GARBAGE\r\n\x02\r\nBASE 012345 \r\nPTEC HC..\r\nIINST 003\r\n\x03\r\n";

    fn reader(bytes: &[u8]) -> FrameReader<LineTransport<tokio_test::io::Mock>> {
        FrameReader::new(LineTransport::new(Builder::new().read(bytes).build()))
    }

    #[test]
    fn test_decode_ascii_strips_crlf() {
        assert_eq!(decode_ascii(b"PAPP 00420 +\r\n").unwrap(), "PAPP 00420 +");
        assert_eq!(decode_ascii(b"\x02\n").unwrap(), "\x02");
        assert_eq!(decode_ascii(b"A\rB\n").unwrap(), "AB");
    }

    #[test]
    fn test_decode_ascii_rejects_high_bytes() {
        let result = decode_ascii(b"PTEC H\xC9..\r\n");
        assert!(matches!(result, Err(TeleinfoError::Decode(_))));
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let mut reader = reader(SCENARIO);

        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.get("BASE"), Some("012345"));
        assert_eq!(snapshot.get("PTEC"), Some("HC.."));
        assert_eq!(snapshot.get("IINST"), Some("003"));
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.primary_counter(), Some(12345));
        assert_eq!(reader.state(), ReaderState::BetweenFrames);
        assert_eq!(reader.statistics().frames_completed, 1);

        assert!(matches!(
            reader.next_frame().await,
            Err(TeleinfoError::StreamClosed)
        ));
    }

    #[tokio::test]
    async fn test_warm_up_discards_frame_start() {
        // The STX line is consumed by the warm-up, so this frame is never opened.
        let mut reader = reader(b"\x02\r\nBASE 000001 \r\n\x03\r\n\x02\r\nPAPP 00420 +\r\n\x03\r\n");

        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.get("BASE"), None);
        assert_eq!(snapshot.get("PAPP"), Some("00420"));
        assert_eq!(reader.statistics().ignored_lines, 2);
    }

    #[tokio::test]
    async fn test_warm_up_disabled() {
        let config = SensorConfig::default().with_discard_first_line(false);
        let mock = Builder::new().read(b"\x02\r\nBASE 000001 \r\n\x03\r\n").build();
        let mut reader = FrameReader::from_config(LineTransport::new(mock), &config);

        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.primary_counter(), Some(1));
    }

    #[tokio::test]
    async fn test_values_persist_across_frames() {
        let mut reader = reader(
            b"\r\n\x02\r\nPTEC HP..\r\nPAPP 00420 +\r\n\x03\r\n\x02\r\nPAPP 00510 +\r\n\x03\r\n",
        );

        let first = reader.next_frame().await.unwrap();
        assert_eq!(first.get("PAPP"), Some("00420"));

        let second = reader.next_frame().await.unwrap();
        assert_eq!(second.get("PAPP"), Some("00510"));
        assert_eq!(second.get("PTEC"), Some("HP.."));
    }

    #[tokio::test]
    async fn test_replayed_frame_is_idempotent() {
        let frame: &[u8] = b"\x02\r\nBASE 000100 \r\nIINST 002 Y\r\n\x03\r\n";
        let mut bytes = b"\r\n".to_vec();
        bytes.extend_from_slice(frame);
        bytes.extend_from_slice(frame);
        let mut reader = reader(&bytes);

        let first = reader.next_frame().await.unwrap();
        let second = reader.next_frame().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second.len(), 2);
    }

    #[tokio::test]
    async fn test_bad_lines_are_skipped() {
        let mut reader = reader(
            b"\r\n\x02\r\nPTEC\r\nIINST \xFF03\r\nBASE abc \r\nPAPP 00420 +\r\n\x03\r\n",
        );

        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.get("PTEC"), None);
        assert_eq!(snapshot.get("IINST"), None);
        assert_eq!(snapshot.get("BASE"), Some("abc"));
        assert_eq!(snapshot.get("PAPP"), Some("00420"));
        assert_eq!(snapshot.primary_counter(), None);

        let stats = reader.statistics();
        assert_eq!(stats.malformed_lines, 1);
        assert_eq!(stats.decode_errors, 1);
        assert_eq!(stats.invalid_counters, 1);
        assert_eq!(stats.measurements_applied, 2);
    }

    #[tokio::test]
    async fn test_lines_outside_frame_ignored() {
        let mut reader = reader(b"\r\nPAPP 99999 +\r\n\x03\r\n\x02\r\nIINST 001 X\r\n\x03\r\n");

        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.get("PAPP"), None);
        assert_eq!(snapshot.get("IINST"), Some("001"));
    }

    #[tokio::test]
    async fn test_shared_boundary_line_closes_frame() {
        // ETX and the next STX on one line: the line only closes the frame.
        let mut reader = reader(
            b"\r\n\x02\r\nPAPP 00420 +\r\n\x03\x02\r\nPAPP 00510 +\r\n\x03\r\n",
        );

        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.get("PAPP"), Some("00420"));
        assert!(matches!(
            reader.next_frame().await,
            Err(TeleinfoError::StreamClosed)
        ));
        assert_eq!(reader.snapshot().get("PAPP"), Some("00420"));
    }

    #[tokio::test]
    async fn test_empty_stream_during_warm_up() {
        let mut reader = FrameReader::new(LineTransport::new(Builder::new().build()));
        assert!(matches!(
            reader.read_next_line().await,
            Err(TeleinfoError::StreamClosed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_mid_line_keeps_frame() {
        let (stream, mut meter) = tokio::io::duplex(256);
        let settings = LineSettings::new().with_timeout(Duration::from_secs(2));
        let config = SensorConfig::default().with_discard_first_line(false);
        let mut reader =
            FrameReader::from_config(LineTransport::with_settings(stream, settings), &config);

        meter.write_all(b"\x02\r\nPAPP 00").await.unwrap();
        assert!(matches!(
            reader.next_frame().await,
            Err(TeleinfoError::Timeout)
        ));
        assert_eq!(reader.state(), ReaderState::InsideFrame);

        meter.write_all(b"420 +\r\n\x03\r\n").await.unwrap();
        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.get("PAPP"), Some("00420"));
        assert_eq!(snapshot.get("420"), None);
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_overlong_line_counted_and_skipped() {
        let mut line = vec![b'X'; 100];
        line.extend_from_slice(b" 1\r\n");
        let mut bytes = b"\r\n\x02\r\n".to_vec();
        bytes.extend_from_slice(&line);
        bytes.extend_from_slice(b"IINST 002\r\n\x03\r\n");

        let mock = Builder::new().read(&bytes).build();
        let settings = LineSettings::new().with_max_line_length(32);
        let mut reader = FrameReader::new(LineTransport::with_settings(mock, settings));

        let snapshot = reader.next_frame().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("IINST"), Some("002"));
        assert_eq!(reader.statistics().decode_errors, 1);
    }

    #[tokio::test]
    async fn test_close() {
        let mut reader = reader(b"");
        reader.close().await.unwrap();
        assert!(reader.is_closed());
    }
}
