//! PSID v2 header model and byte-exact serialization.
//!
//! Layout (all integers big-endian):
//!
//! | Offset | Size | Field                            |
//! |--------|------|----------------------------------|
//! | $00    | 4    | magic "PSID"                     |
//! | $04    | 2    | version (2)                      |
//! | $06    | 2    | data offset ($7C)                |
//! | $08    | 2    | load address                     |
//! | $0A    | 2    | init address                     |
//! | $0C    | 2    | play address                     |
//! | $0E    | 2    | song count                       |
//! | $10    | 2    | start song (1-based)             |
//! | $12    | 4    | speed bitmask                    |
//! | $16    | 32   | title, null-padded ASCII         |
//! | $36    | 32   | author, null-padded ASCII        |
//! | $56    | 32   | released, null-padded ASCII      |
//! | $76    | 2    | flags                            |
//! | $78    | 2    | relocation start page / length   |
//! | $7A    | 2    | 2nd / 3rd SID addresses          |
//!
//! Everything from $78 on stays zero for files produced here.

use bitflags::bitflags;

use sid6581::chip::{ChipProfile, SidModel, VideoStandard};

use crate::error::{PsidError, Result};

/// Exact serialized header length in bytes.
pub const HEADER_SIZE: usize = 0x7C;

/// Magic identifying the PSID container variant.
pub const PSID_MAGIC: [u8; 4] = *b"PSID";

/// Container version this crate writes.
pub const PSID_VERSION: u16 = 2;

/// Size of each metadata string field.
pub const STRING_SIZE: usize = 32;

bitflags! {
    /// PSID v2 flag word.
    ///
    /// Bits 2-3 describe the intended video clock and bits 4-5 the SID
    /// revision; both are two-bit fields where setting both bits means
    /// "plays on either".
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PsidFlags: u16 {
        /// Data is a Compute!'s Sidplayer MUS module.
        const BUILT_IN_MUS = 0x0001;
        /// Tune is PlaySID-specific (samples etc.).
        const PSID_SPECIFIC = 0x0002;
        /// Intended for PAL (50 Hz) machines.
        const CLOCK_PAL = 0x0004;
        /// Intended for NTSC (60 Hz) machines.
        const CLOCK_NTSC = 0x0008;
        /// Written for the MOS 6581.
        const SID_6581 = 0x0010;
        /// Written for the MOS 8580.
        const SID_8580 = 0x0020;
    }
}

impl Default for PsidFlags {
    fn default() -> Self {
        PsidFlags::empty()
    }
}

impl PsidFlags {
    /// Clock and model flags matching a chip profile.
    pub fn for_profile(profile: &ChipProfile) -> Self {
        let clock = match profile.video {
            VideoStandard::Pal => PsidFlags::CLOCK_PAL,
            VideoStandard::Ntsc => PsidFlags::CLOCK_NTSC,
        };
        let model = match profile.model {
            SidModel::Mos6581 => PsidFlags::SID_6581,
            SidModel::Mos8580 => PsidFlags::SID_8580,
        };
        clock | model
    }
}

/// PSID v2 header record.
///
/// `Default` yields the single-song layout this toolchain emits: load at
/// `$1000`, init at the load address, play vector three bytes in, speed 0
/// (play called once per vertical blank).
#[derive(Clone, Debug, PartialEq)]
pub struct PsidHeader {
    /// Offset of the program data from file start; must equal
    /// [`HEADER_SIZE`].
    pub data_offset: u16,
    /// C64 address the program data loads at.
    pub load_address: u16,
    /// Address of the init routine.
    pub init_address: u16,
    /// Address players call once per frame.
    pub play_address: u16,
    /// Number of songs in the file.
    pub songs: u16,
    /// 1-based index of the song to start with.
    pub start_song: u16,
    /// Per-song timing bitmask; 0 = vertical blank for every song.
    pub speed: u32,
    /// Song title, at most 32 ASCII bytes.
    pub title: String,
    /// Composer, at most 32 ASCII bytes.
    pub author: String,
    /// Release info, at most 32 ASCII bytes.
    pub released: String,
    /// Clock / SID model flags.
    pub flags: PsidFlags,
    /// Relocation start page (0 = not relocatable information).
    pub start_page: u8,
    /// Relocation range length in pages.
    pub page_length: u8,
    /// Encoded address of a second SID (0 = none).
    pub second_sid_address: u8,
    /// Encoded address of a third SID (0 = none).
    pub third_sid_address: u8,
}

impl Default for PsidHeader {
    fn default() -> Self {
        Self {
            data_offset: HEADER_SIZE as u16,
            load_address: 0x1000,
            init_address: 0x1000,
            play_address: 0x1003,
            songs: 1,
            start_song: 1,
            speed: 0,
            title: String::new(),
            author: String::new(),
            released: String::new(),
            flags: PsidFlags::default(),
            start_page: 0,
            page_length: 0,
            second_sid_address: 0,
            third_sid_address: 0,
        }
    }
}

impl PsidHeader {
    /// Serialize the header to its 124-byte wire form.
    ///
    /// Fails with [`PsidError::HeaderLayoutMismatch`] when the declared
    /// data offset does not equal the actual header length; the check runs
    /// before any byte is handed to a writer.
    pub fn serialize(&self) -> Result<[u8; HEADER_SIZE]> {
        if self.data_offset as usize != HEADER_SIZE {
            return Err(PsidError::HeaderLayoutMismatch {
                declared: self.data_offset,
                actual: HEADER_SIZE,
            });
        }

        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0x00..0x04].copy_from_slice(&PSID_MAGIC);
        bytes[0x04..0x06].copy_from_slice(&PSID_VERSION.to_be_bytes());
        bytes[0x06..0x08].copy_from_slice(&self.data_offset.to_be_bytes());
        bytes[0x08..0x0A].copy_from_slice(&self.load_address.to_be_bytes());
        bytes[0x0A..0x0C].copy_from_slice(&self.init_address.to_be_bytes());
        bytes[0x0C..0x0E].copy_from_slice(&self.play_address.to_be_bytes());
        bytes[0x0E..0x10].copy_from_slice(&self.songs.to_be_bytes());
        bytes[0x10..0x12].copy_from_slice(&self.start_song.to_be_bytes());
        bytes[0x12..0x16].copy_from_slice(&self.speed.to_be_bytes());
        bytes[0x16..0x36].copy_from_slice(&fixed_string(&self.title));
        bytes[0x36..0x56].copy_from_slice(&fixed_string(&self.author));
        bytes[0x56..0x76].copy_from_slice(&fixed_string(&self.released));
        bytes[0x76..0x78].copy_from_slice(&self.flags.bits().to_be_bytes());
        bytes[0x78] = self.start_page;
        bytes[0x79] = self.page_length;
        bytes[0x7A] = self.second_sid_address;
        bytes[0x7B] = self.third_sid_address;
        Ok(bytes)
    }

    /// Parse a header back from its wire form.
    ///
    /// Accepts exactly the layout [`serialize`](Self::serialize) writes;
    /// used for round-trip verification and inspection tooling.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(PsidError::MalformedHeader {
                msg: format!("{} bytes is too short for a v2 header", data.len()),
            });
        }
        if data[0x00..0x04] != PSID_MAGIC {
            return Err(PsidError::MalformedHeader {
                msg: "missing PSID magic".into(),
            });
        }
        let version = read_be_u16(data, 0x04);
        if version != PSID_VERSION {
            return Err(PsidError::MalformedHeader {
                msg: format!("unsupported version {version}"),
            });
        }

        Ok(Self {
            data_offset: read_be_u16(data, 0x06),
            load_address: read_be_u16(data, 0x08),
            init_address: read_be_u16(data, 0x0A),
            play_address: read_be_u16(data, 0x0C),
            songs: read_be_u16(data, 0x0E),
            start_song: read_be_u16(data, 0x10),
            speed: read_be_u32(data, 0x12),
            title: read_string(data, 0x16),
            author: read_string(data, 0x36),
            released: read_string(data, 0x56),
            flags: PsidFlags::from_bits_retain(read_be_u16(data, 0x76)),
            start_page: data[0x78],
            page_length: data[0x79],
            second_sid_address: data[0x7A],
            third_sid_address: data[0x7B],
        })
    }
}

/// Encode a metadata string into its fixed 32-byte field.
///
/// Input is truncated to 32 bytes, null-padded when shorter, and non-ASCII
/// bytes are replaced by `?` so the field always holds plain ASCII.
fn fixed_string(text: &str) -> [u8; STRING_SIZE] {
    let mut field = [0u8; STRING_SIZE];
    for (slot, byte) in field.iter_mut().zip(text.bytes()) {
        *slot = if byte.is_ascii() { byte } else { b'?' };
    }
    field
}

fn read_be_u16(data: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_be_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

fn read_string(data: &[u8], offset: usize) -> String {
    let field = &data[offset..offset + STRING_SIZE];
    let end = field.iter().position(|&b| b == 0).unwrap_or(STRING_SIZE);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialized_header_is_exactly_124_bytes() {
        let bytes = PsidHeader::default().serialize().unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        assert_eq!(&bytes[0..4], b"PSID");
        // Version and data offset, big-endian.
        assert_eq!(bytes[0x04..0x06], [0x00, 0x02]);
        assert_eq!(bytes[0x06..0x08], [0x00, 0x7C]);
        // Default addresses.
        assert_eq!(bytes[0x08..0x0A], [0x10, 0x00]);
        assert_eq!(bytes[0x0C..0x0E], [0x10, 0x03]);
    }

    #[test]
    fn wrong_data_offset_is_rejected() {
        let header = PsidHeader {
            data_offset: 0x76,
            ..PsidHeader::default()
        };
        assert!(matches!(
            header.serialize(),
            Err(PsidError::HeaderLayoutMismatch {
                declared: 0x76,
                actual: HEADER_SIZE
            })
        ));
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let header = PsidHeader {
            load_address: 0x0801,
            init_address: 0x0801,
            play_address: 0x0810,
            songs: 3,
            start_song: 2,
            speed: 0xDEAD_BEEF,
            title: "Ode to 64".into(),
            author: "A. Composer".into(),
            released: "2025 slippyex".into(),
            flags: PsidFlags::CLOCK_PAL | PsidFlags::SID_6581,
            ..PsidHeader::default()
        };
        let bytes = header.serialize().unwrap();
        let parsed = PsidHeader::parse(&bytes).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn string_field_boundaries() {
        // Exactly 32 bytes: stored without any padding.
        let exact: String = "x".repeat(32);
        assert_eq!(fixed_string(&exact), [b'x'; 32]);
        // 40 bytes: truncated to the first 32.
        let long: String = "y".repeat(40);
        assert_eq!(fixed_string(&long), [b'y'; 32]);
        // Empty: all zero.
        assert_eq!(fixed_string(""), [0u8; 32]);
        // Shorter strings are null-padded, not space-padded.
        let field = fixed_string("abc");
        assert_eq!(&field[..3], b"abc");
        assert!(field[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn non_ascii_metadata_is_replaced() {
        let field = fixed_string("Rüscio");
        // 'ü' is two UTF-8 bytes, both non-ASCII.
        assert_eq!(&field[..7], b"R??scio");
    }

    #[test]
    fn profile_flags_match_chip() {
        let pal = ChipProfile::resolve("6581");
        assert_eq!(
            PsidFlags::for_profile(pal),
            PsidFlags::CLOCK_PAL | PsidFlags::SID_6581
        );
        let ntsc = ChipProfile::resolve("8580");
        assert_eq!(
            PsidFlags::for_profile(ntsc),
            PsidFlags::CLOCK_NTSC | PsidFlags::SID_8580
        );
    }

    #[test]
    fn parse_rejects_foreign_data() {
        assert!(PsidHeader::parse(&[0u8; 16]).is_err());
        let mut bytes = PsidHeader::default().serialize().unwrap();
        bytes[0] = b'R'; // "RSID"
        assert!(matches!(
            PsidHeader::parse(&bytes),
            Err(PsidError::MalformedHeader { .. })
        ));
    }
}
