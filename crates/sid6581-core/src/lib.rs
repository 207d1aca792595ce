//! MOS 6581/8580 SID chip model.
//!
//! Shared building blocks for tools that target the Commodore 64 sound chip:
//! - Chip profiles for the two SID revisions with their system clocks
//! - The memory-mapped register layout at `$D400`
//! - Conversion between frequencies in Hz and 16-bit oscillator words
//!
//! # Quick start
//! ```
//! use sid6581::{freq_to_register, ChipProfile};
//!
//! let profile = ChipProfile::resolve("6581");
//! let word = freq_to_register(440.0, profile);
//! assert_eq!(word, 7493);
//! ```
//!
//! Higher-level concerns (pitch analysis, PSID containers, driver code) live
//! in the sibling crates `sid6581-pitch`, `sid6581-psid`, and
//! `sid6581-driver`.

#![warn(missing_docs)]

pub mod chip;
pub mod quantize;
pub mod registers;

pub use chip::{ChipProfile, SidModel, VideoStandard, PROFILES};
pub use quantize::{freq_to_register, register_to_freq};
pub use registers::WaveControl;
