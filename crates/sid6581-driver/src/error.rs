//! Error handling for driver synthesis.

use thiserror::Error;

/// Convenient result alias for assembly and synthesis operations.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that may occur while assembling or synthesizing driver code.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The same label was defined twice.
    #[error("label '{label}' defined twice")]
    DuplicateLabel {
        /// Offending label name.
        label: String,
    },
    /// A referenced label was never defined.
    #[error("label '{label}' referenced but never defined")]
    UnboundLabel {
        /// Offending label name.
        label: String,
    },
    /// A conditional branch target is further than one signed byte away.
    #[error("branch to '{label}' spans {distance} bytes, outside [-128, 127]")]
    BranchOutOfRange {
        /// Branch target label.
        label: String,
        /// Actual displacement in bytes.
        distance: i32,
    },
    /// Voice index outside the chip's three voices.
    #[error("voice {voice} does not exist, SID has voices 0-2")]
    InvalidVoice {
        /// Requested voice index.
        voice: u8,
    },
    /// Frequency stream too long for the driver's 16-bit frame counter.
    #[error("{frames} frames exceed the driver's 65535-frame limit")]
    TooManyFrames {
        /// Requested stream length.
        frames: usize,
    },
    /// Code plus data does not fit the C64 address space.
    #[error("image of {image_size} bytes at {load_address:#06x} exceeds the 64 KiB address space")]
    ImageTooLarge {
        /// Configured load address.
        load_address: u16,
        /// Driver code plus data size in bytes.
        image_size: usize,
    },
}
