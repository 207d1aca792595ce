//! Error handling for PSID serialization and writing.

use thiserror::Error;

/// Convenient result alias for PSID container operations.
pub type Result<T> = std::result::Result<T, PsidError>;

/// Errors that may occur while building or writing a PSID container.
#[derive(Debug, Error)]
pub enum PsidError {
    /// Declared data offset disagrees with the serialized header length.
    ///
    /// Raised before any byte reaches the filesystem; downstream loaders
    /// seek to the declared offset, so a mismatch would corrupt playback
    /// silently.
    #[error("header declares data offset {declared:#06x} but serializes to {actual:#06x} bytes")]
    HeaderLayoutMismatch {
        /// Offset recorded in the header's dataOffset field.
        declared: u16,
        /// Actual serialized header length.
        actual: usize,
    },
    /// Program image does not fit the C64 address space.
    #[error(
        "image of {image_size} bytes at load address {load_address:#06x} exceeds the 64 KiB address space"
    )]
    AddressRangeExceeded {
        /// Address the image would load at.
        load_address: u16,
        /// Driver code plus data size in bytes.
        image_size: usize,
    },
    /// Buffer too small or malformed while parsing a header back.
    #[error("malformed PSID header: {msg}")]
    MalformedHeader {
        /// What failed to parse.
        msg: String,
    },
    /// IO error from the filesystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
