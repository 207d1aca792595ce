//! Error handling for waveform input and pitch analysis.

use thiserror::Error;

/// Convenient result alias for pitch extraction operations.
pub type Result<T> = std::result::Result<T, PitchError>;

/// Errors that may occur while reading audio or tracking pitch.
#[derive(Debug, Error)]
pub enum PitchError {
    /// IO error from the filesystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Input file is not a decodable WAV.
    #[error("WAV decode error: {0}")]
    WavDecode(#[from] hound::Error),
    /// Waveform shape the decoder cannot handle.
    #[error("unsupported waveform: {msg}")]
    UnsupportedWaveform {
        /// What made the waveform unusable.
        msg: String,
    },
    /// Oracle-style parallel arrays disagree in length.
    #[error("{frequencies} frequency estimates but {times} timestamps")]
    ShapeMismatch {
        /// Number of frequency estimates supplied.
        frequencies: usize,
        /// Number of frame timestamps supplied.
        times: usize,
    },
    /// Analysis parameters that cannot produce a valid result.
    #[error("invalid analysis configuration: {msg}")]
    InvalidConfig {
        /// Which parameter combination was rejected.
        msg: String,
    },
}
