//! Teleinfo frame handling

pub mod decoder;
pub mod reader;
pub mod state;
pub mod statistics;

pub use decoder::FieldDecoder;
pub use reader::{decode_ascii, FrameReader};
pub use state::{LineKind, ReaderState, ETX, STX};
pub use statistics::ReaderStatistics;
