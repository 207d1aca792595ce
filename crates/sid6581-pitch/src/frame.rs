//! Per-frame pitch estimate.

/// One fundamental frequency estimate on the analysis grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchFrame {
    /// Ordinal frame number, strictly ascending within a track.
    pub index: usize,
    /// Frame start time in seconds from the beginning of the stream.
    pub time_seconds: f64,
    /// Estimated fundamental frequency in Hz; 0.0 means unvoiced/silence.
    pub frequency_hz: f64,
}

impl PitchFrame {
    /// Whether this frame carries a pitch (non-zero frequency).
    pub fn is_voiced(&self) -> bool {
        self.frequency_hz > 0.0
    }
}
