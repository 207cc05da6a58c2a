//! Frame reader state machine

/// Start-of-Text, opens a frame
pub const STX: char = '\x02';
/// End-of-Text, closes a frame
pub const ETX: char = '\x03';

/// Frame reader state
///
/// # State Transitions
/// ```text
/// BetweenFrames --(line contains STX)--> InsideFrame
/// BetweenFrames --(any other line)-----> BetweenFrames
/// InsideFrame   --(line contains ETX)--> BetweenFrames
/// InsideFrame   --(any other line)-----> InsideFrame
/// ```
///
/// A line is only tested for STX between frames and only for ETX inside a
/// frame. A line carrying both markers while inside a frame therefore closes
/// the frame and does not reopen one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Searching for Start-of-Text (initial state)
    BetweenFrames,
    /// Accumulating measurements until End-of-Text
    InsideFrame,
}

/// Classification of a decoded line in the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Carries STX while between frames
    FrameStart,
    /// Interior line, forwarded to the field decoder
    Measurement,
    /// Carries ETX while inside a frame
    FrameEnd,
    /// Noise between frames
    Ignored,
}

impl ReaderState {
    /// Classify a line according to the current state
    ///
    /// # Arguments
    /// * `line` - A decoded line; markers may sit anywhere in it
    ///
    /// # Returns
    /// The line's role. Only the marker relevant to the current state is
    /// looked for, which makes ETX win over STX inside a frame.
    pub fn classify(&self, line: &str) -> LineKind {
        match self {
            ReaderState::BetweenFrames if line.contains(STX) => LineKind::FrameStart,
            ReaderState::BetweenFrames => LineKind::Ignored,
            ReaderState::InsideFrame if line.contains(ETX) => LineKind::FrameEnd,
            ReaderState::InsideFrame => LineKind::Measurement,
        }
    }

    /// State reached after handling a line of the given kind
    pub fn next(&self, kind: LineKind) -> ReaderState {
        match kind {
            LineKind::FrameStart | LineKind::Measurement => ReaderState::InsideFrame,
            LineKind::FrameEnd | LineKind::Ignored => ReaderState::BetweenFrames,
        }
    }

    pub fn is_inside_frame(&self) -> bool {
        matches!(self, ReaderState::InsideFrame)
    }

    /// Get human-readable state name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReaderState::BetweenFrames => "BetweenFrames",
            ReaderState::InsideFrame => "InsideFrame",
        }
    }
}

impl Default for ReaderState {
    fn default() -> Self {
        ReaderState::BetweenFrames
    }
}
