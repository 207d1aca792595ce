//! SID register map.
//!
//! The chip exposes 25 write-mostly registers memory-mapped at `$D400`:
//! seven per voice (frequency, pulse width, control, envelope), followed by
//! filter and volume registers. Offsets here are relative to [`SID_BASE`]
//! unless noted otherwise.

use bitflags::bitflags;

/// Base address of the SID register window in C64 memory.
pub const SID_BASE: u16 = 0xD400;

/// Number of registers in the window (`$D400`-`$D418`).
pub const REGISTER_COUNT: usize = 0x19;

/// Number of independent voices.
pub const VOICE_COUNT: u8 = 3;

/// Register stride between consecutive voices.
pub const VOICE_STRIDE: u16 = 7;

/// Voice register offset: oscillator frequency, low byte.
pub const FREQ_LO: u16 = 0x00;
/// Voice register offset: oscillator frequency, high byte.
pub const FREQ_HI: u16 = 0x01;
/// Voice register offset: pulse width, low byte.
pub const PW_LO: u16 = 0x02;
/// Voice register offset: pulse width, high 4 bits.
pub const PW_HI: u16 = 0x03;
/// Voice register offset: waveform and gate control.
pub const CONTROL: u16 = 0x04;
/// Voice register offset: attack/decay envelope rates.
pub const ATTACK_DECAY: u16 = 0x05;
/// Voice register offset: sustain level / release rate.
pub const SUSTAIN_RELEASE: u16 = 0x06;

/// Global register offset: filter mode and master volume.
pub const MODE_VOLUME: u16 = 0x18;

bitflags! {
    /// Bits of a voice's control register.
    ///
    /// The waveform bits select the oscillator output; GATE starts the
    /// envelope attack when set and the release when cleared.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct WaveControl: u8 {
        /// Envelope gate.
        const GATE = 0x01;
        /// Hard-sync with the previous voice's oscillator.
        const SYNC = 0x02;
        /// Ring modulation with the previous voice.
        const RING_MOD = 0x04;
        /// Test bit: resets and locks the oscillator.
        const TEST = 0x08;
        /// Triangle waveform.
        const TRIANGLE = 0x10;
        /// Sawtooth waveform.
        const SAWTOOTH = 0x20;
        /// Pulse waveform (width set via PW registers).
        const PULSE = 0x40;
        /// Noise waveform.
        const NOISE = 0x80;
    }
}

/// Absolute address of a voice register.
///
/// `voice` is masked to the valid range [0, 2] so callers cannot address
/// outside the voice block.
#[inline]
pub fn voice_register(voice: u8, offset: u16) -> u16 {
    let voice = (voice % VOICE_COUNT) as u16;
    SID_BASE + voice * VOICE_STRIDE + offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_register_addresses() {
        assert_eq!(voice_register(0, FREQ_LO), 0xD400);
        assert_eq!(voice_register(0, FREQ_HI), 0xD401);
        assert_eq!(voice_register(1, FREQ_LO), 0xD407);
        assert_eq!(voice_register(2, CONTROL), 0xD412);
        assert_eq!(voice_register(2, SUSTAIN_RELEASE), 0xD414);
    }

    #[test]
    fn voice_register_masks_out_of_range_voice() {
        assert_eq!(voice_register(3, FREQ_LO), voice_register(0, FREQ_LO));
        assert_eq!(voice_register(4, FREQ_LO), voice_register(1, FREQ_LO));
    }

    #[test]
    fn mode_volume_is_last_register() {
        assert_eq!(SID_BASE + MODE_VOLUME, 0xD418);
        assert_eq!(MODE_VOLUME as usize, REGISTER_COUNT - 1);
    }

    #[test]
    fn wave_control_bits() {
        let lead = WaveControl::TRIANGLE | WaveControl::GATE;
        assert_eq!(lead.bits(), 0x11);
        assert_eq!(WaveControl::NOISE.bits(), 0x80);
    }
}
