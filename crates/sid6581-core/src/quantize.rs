//! Conversion between frequencies in Hz and SID oscillator words.
//!
//! The SID generates pitch with a 24-bit phase accumulator; the programmable
//! 16-bit frequency word is added to the accumulator every system clock
//! cycle, so the produced frequency is `word * clock / 2^24`. Inverting that
//! relation maps a detected pitch onto the register value to program.

use crate::chip::ChipProfile;

/// Phase accumulator range, `2^24`.
const PHASE_ACCUMULATOR_SCALE: f64 = 16_777_216.0;

/// Convert a frequency in Hz to the 16-bit oscillator word for `profile`.
///
/// Non-positive and non-finite frequencies encode as 0 (silence). The ideal
/// word `frequency_hz * 2^24 / clock` is rounded half away from zero
/// (`f64::round`), which keeps results identical across platforms, then
/// masked to the low 16 bits. Values past 65535 alias instead of saturating:
/// the hardware only exposes the top 16 bits of the accumulator increment,
/// so out-of-range pitches wrap exactly like they would on the chip.
///
/// ```
/// use sid6581::{freq_to_register, ChipProfile};
///
/// let pal = ChipProfile::resolve("6581");
/// assert_eq!(freq_to_register(440.0, pal), 7493);
/// assert_eq!(freq_to_register(0.0, pal), 0);
/// assert_eq!(freq_to_register(-1.0, pal), 0);
/// ```
pub fn freq_to_register(frequency_hz: f64, profile: &ChipProfile) -> u16 {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return 0;
    }
    let word = (frequency_hz * PHASE_ACCUMULATOR_SCALE / profile.clock_hz as f64).round();
    (word as u64 & 0xFFFF) as u16
}

/// Frequency in Hz produced by a register word under `profile`.
///
/// Inverse of [`freq_to_register`] up to quantization, useful for
/// diagnostics and round-trip checks.
pub fn register_to_freq(word: u16, profile: &ChipProfile) -> f64 {
    word as f64 * profile.clock_hz as f64 / PHASE_ACCUMULATOR_SCALE
}
