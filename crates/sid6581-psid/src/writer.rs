//! Atomic PSID file writer.
//!
//! A container is assembled as header + driver code + frequency words and
//! written through a temporary file in the destination directory, renamed
//! into place only after every byte landed. An interrupted or failed write
//! therefore never leaves a file a loader would accept: the destination
//! either does not exist or still holds its previous, complete content.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{PsidError, Result};
use crate::header::PsidHeader;

/// C64 address space size; load address + image must stay inside it.
const ADDRESS_SPACE: usize = 0x1_0000;

/// Write a complete PSID container to `path`.
///
/// `driver_code` is emitted verbatim right after the header (the loader
/// places it at the header's load address); `data_words` follow as raw
/// little-endian 16-bit values, the byte order the 6510 driver reads them
/// in. Note the asymmetry against the big-endian header integers; both
/// orders are fixed by their respective consumers.
///
/// All structural validation (header layout, address range) happens before
/// the filesystem is touched. The destination is created or atomically
/// replaced on success.
pub fn write_psid_file<P: AsRef<Path>>(
    path: P,
    header: &PsidHeader,
    driver_code: &[u8],
    data_words: &[u16],
) -> Result<()> {
    let path = path.as_ref();
    let header_bytes = header.serialize()?;

    let image_size = driver_code.len() + data_words.len() * 2;
    if header.load_address as usize + image_size > ADDRESS_SPACE {
        return Err(PsidError::AddressRangeExceeded {
            load_address: header.load_address,
            image_size,
        });
    }

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(&header_bytes)?;
    file.write_all(driver_code)?;
    let mut data = Vec::with_capacity(data_words.len() * 2);
    for word in data_words {
        data.extend_from_slice(&word.to_le_bytes());
    }
    file.write_all(&data)?;
    file.flush()?;
    file.persist(path).map_err(|e| PsidError::Io(e.error))?;
    Ok(())
}
