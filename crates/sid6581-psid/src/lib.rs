//! PSID v2 container support.
//!
//! The `.sid` format wraps a C64 program (init/play routines plus data) in
//! a 124-byte header that tells players where to load it and how to call
//! it. This crate provides the header model, its byte-exact serialization,
//! and an atomic file writer for complete containers.
//!
//! Two byte-order conventions meet in one file and both are intentional:
//! header integers are big-endian (the loader convention shared with other
//! HVSC formats), while the frequency data appended behind the driver code
//! is little-endian, the native layout the 6510 reads. Keep them apart.
//!
//! # Example
//! ```no_run
//! use sid6581_psid::{write_psid_file, PsidHeader};
//!
//! # fn main() -> sid6581_psid::Result<()> {
//! let header = PsidHeader {
//!     title: "Melody".into(),
//!     ..PsidHeader::default()
//! };
//! write_psid_file("melody.sid", &header, &[0x60], &[7493, 7493, 0])?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod header;
pub mod writer;

pub use error::{PsidError, Result};
pub use header::{PsidFlags, PsidHeader, HEADER_SIZE, PSID_MAGIC, PSID_VERSION};
pub use writer::write_psid_file;
