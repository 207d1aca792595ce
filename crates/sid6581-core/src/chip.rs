//! SID chip profiles and the profile registry.
//!
//! The SID shipped in two revisions with different system clocks: the
//! original MOS 6581 in PAL machines and the reworked MOS 8580 in (mostly
//! NTSC) later models. The oscillator frequency encoding depends on the
//! system clock, so every conversion starts by resolving a profile.

/// PAL C64 system clock in Hz (MOS 6581 machines).
pub const CLOCK_PAL_HZ: u32 = 985_248;

/// NTSC C64 system clock in Hz (MOS 8580 machines).
pub const CLOCK_NTSC_HZ: u32 = 1_022_730;

/// PAL vertical blank rate in Hz.
pub const FRAME_RATE_PAL: u32 = 50;

/// NTSC vertical blank rate in Hz.
pub const FRAME_RATE_NTSC: u32 = 60;

/// SID chip revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidModel {
    /// Original SID (1982) with the characteristic analog filter.
    Mos6581,
    /// Revised SID (1987) with a cleaner, more linear filter.
    Mos8580,
}

impl SidModel {
    /// Canonical name as used in file metadata and CLI arguments.
    pub fn as_str(&self) -> &'static str {
        match self {
            SidModel::Mos6581 => "6581",
            SidModel::Mos8580 => "8580",
        }
    }
}

/// Video standard of the host machine, which fixes the frame tick rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoStandard {
    /// 50 Hz vertical blank.
    Pal,
    /// 60 Hz vertical blank.
    Ntsc,
}

impl VideoStandard {
    /// Vertical blank rate in Hz (50 PAL / 60 NTSC).
    pub fn frame_rate(&self) -> u32 {
        match self {
            VideoStandard::Pal => FRAME_RATE_PAL,
            VideoStandard::Ntsc => FRAME_RATE_NTSC,
        }
    }
}

/// Immutable description of one SID configuration.
///
/// Constructed once in the [`PROFILES`] table; all lookups hand out
/// `'static` references into it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipProfile {
    /// Chip revision.
    pub model: SidModel,
    /// System clock feeding the chip, in Hz.
    pub clock_hz: u32,
    /// Video standard of the host machine.
    pub video: VideoStandard,
}

/// Registry of supported chip configurations.
///
/// The first entry is the default that unknown identifiers resolve to.
pub static PROFILES: [ChipProfile; 2] = [
    ChipProfile {
        model: SidModel::Mos6581,
        clock_hz: CLOCK_PAL_HZ,
        video: VideoStandard::Pal,
    },
    ChipProfile {
        model: SidModel::Mos8580,
        clock_hz: CLOCK_NTSC_HZ,
        video: VideoStandard::Ntsc,
    },
];

impl ChipProfile {
    /// Look up a profile by identifier.
    ///
    /// Accepts the bare revision number ("6581", "8580") as well as the
    /// "mos6581"-style spelling, case-insensitive. Unknown identifiers
    /// resolve to the default profile (6581/PAL) rather than failing, so
    /// the conversion pipeline never stalls on a typo in a chip name.
    pub fn resolve(identifier: &str) -> &'static ChipProfile {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "6581" | "mos6581" => &PROFILES[0],
            "8580" | "mos8580" => &PROFILES[1],
            _ => ChipProfile::default_profile(),
        }
    }

    /// The default profile (first registry entry, 6581/PAL).
    pub fn default_profile() -> &'static ChipProfile {
        &PROFILES[0]
    }

    /// Driver tick rate for this profile in Hz.
    ///
    /// PSID players call the play routine once per vertical blank, so the
    /// tick rate follows the video standard.
    pub fn tick_rate(&self) -> u32 {
        self.video.frame_rate()
    }
}
