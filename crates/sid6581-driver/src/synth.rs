//! Play-routine synthesis.
//!
//! Layout of the synthesized image, all inside one contiguous block at the
//! configured load address:
//!
//! ```text
//! load+0   JMP init          ; init vector
//! load+3   play routine      ; called once per video frame
//!          init routine      ; falls through into rewind
//!          rewind subroutine
//! data     frequency words   ; appended by the container writer
//! ```
//!
//! The play vector sits at the fixed `load + 3` so the header can point at
//! it without a second jump table. The routine keeps its state in zero
//! page: a two-byte cursor into the data words and a two-byte remaining
//! frame counter, both (re)initialized by `rewind`.
//!
//! Per tick the routine fetches the next word and writes frequency low,
//! frequency high, then the control register. Both halves of the register
//! pair land inside the same play call, so the oscillator never runs a
//! full frame on a half-updated frequency. The tick source is the PSID
//! host itself: with header speed 0 the environment calls play once per
//! vertical blank (50 Hz PAL / 60 Hz NTSC), which is why the pitch stream
//! must be retimed to that rate before synthesis.
//!
//! At end of stream the driver either rewinds and keeps playing (loop
//! mode) or releases the gate and answers every further tick with silence
//! (halt mode).

use sid6581::registers::{
    voice_register, WaveControl, ATTACK_DECAY, CONTROL, FREQ_HI, FREQ_LO, MODE_VOLUME,
    REGISTER_COUNT, SID_BASE, SUSTAIN_RELEASE, VOICE_COUNT,
};

use crate::asm::Assembler;
use crate::error::{DriverError, Result};

/// Zero-page location of the data cursor (two bytes).
///
/// `$FB-$FE` are free under BASIC and the KERNAL, the usual spot for
/// player state.
const ZP_CURSOR: u8 = 0xFB;

/// Zero-page location of the remaining-frame counter (two bytes).
const ZP_REMAINING: u8 = 0xFD;

/// Attack/decay setting: instant attack, no decay.
const ENVELOPE_ATTACK_DECAY: u8 = 0x00;

/// Sustain/release setting: full sustain, fastest release.
const ENVELOPE_SUSTAIN_RELEASE: u8 = 0xF0;

/// C64 address space size.
const ADDRESS_SPACE: usize = 0x1_0000;

/// Parameters of the synthesized driver.
#[derive(Clone, Copy, Debug)]
pub struct DriverConfig {
    /// Address the image loads at.
    pub load_address: u16,
    /// Voice (0-2) that plays the stream.
    pub voice: u8,
    /// Rewind at end of stream instead of halting.
    pub loop_playback: bool,
    /// Master volume (0-15).
    pub volume: u8,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            load_address: 0x1000,
            voice: 0,
            loop_playback: true,
            volume: 15,
        }
    }
}

/// Synthesized driver code and its entry points.
#[derive(Clone, Debug)]
pub struct Driver {
    /// Machine code, to be placed at the configured load address.
    pub code: Vec<u8>,
    /// Init routine entry (equals the load address).
    pub init_address: u16,
    /// Per-frame play routine entry (load address + 3).
    pub play_address: u16,
    /// Where the frequency words must follow the code.
    pub data_address: u16,
}

/// Assemble a driver for a stream of `frame_count` frequency words.
///
/// The returned code does not include the words themselves; the container
/// writer appends them directly behind it, which is exactly where the
/// rewind routine points the cursor.
pub fn synthesize(config: &DriverConfig, frame_count: usize) -> Result<Driver> {
    if config.voice >= VOICE_COUNT {
        return Err(DriverError::InvalidVoice {
            voice: config.voice,
        });
    }
    if frame_count > u16::MAX as usize {
        return Err(DriverError::TooManyFrames {
            frames: frame_count,
        });
    }

    let freq_lo = voice_register(config.voice, FREQ_LO);
    let freq_hi = voice_register(config.voice, FREQ_HI);
    let control = voice_register(config.voice, CONTROL);
    let tone_on = (WaveControl::TRIANGLE | WaveControl::GATE).bits();
    let tone_off = WaveControl::TRIANGLE.bits();
    let frames = frame_count as u16;

    let mut asm = Assembler::new(config.load_address);
    asm.jmp("init");

    // ---- play: one frame per call ------------------------------------
    asm.label("play")?;
    asm.lda_zp(ZP_REMAINING);
    asm.ora_zp(ZP_REMAINING + 1);
    asm.beq("ended");

    asm.label("tick")?;
    asm.ldy_imm(0);
    asm.lda_ind_y(ZP_CURSOR);
    asm.sta_abs(freq_lo);
    asm.iny();
    asm.lda_ind_y(ZP_CURSOR);
    asm.sta_abs(freq_hi);
    asm.lda_imm(tone_on);
    asm.sta_abs(control);

    // cursor += 2
    asm.clc();
    asm.lda_zp(ZP_CURSOR);
    asm.adc_imm(2);
    asm.sta_zp(ZP_CURSOR);
    asm.bcc("no_carry");
    asm.inc_zp(ZP_CURSOR + 1);
    asm.label("no_carry")?;

    // remaining -= 1
    asm.lda_zp(ZP_REMAINING);
    asm.bne("dec_low");
    asm.dec_zp(ZP_REMAINING + 1);
    asm.label("dec_low")?;
    asm.dec_zp(ZP_REMAINING);
    asm.rts();

    // ---- end of stream -----------------------------------------------
    asm.label("ended")?;
    if config.loop_playback {
        // Rewind and play the first frame in this same call; an empty
        // stream falls through to silence instead of spinning.
        asm.jsr("rewind");
        asm.lda_zp(ZP_REMAINING);
        asm.ora_zp(ZP_REMAINING + 1);
        asm.bne("tick");
    }
    asm.lda_imm(tone_off);
    asm.sta_abs(control);
    asm.rts();

    // ---- init: called once by the player environment ------------------
    asm.label("init")?;
    asm.lda_imm(0);
    asm.tax();
    asm.label("clear")?;
    asm.sta_abs_x(SID_BASE);
    asm.inx();
    asm.cpx_imm(REGISTER_COUNT as u8);
    asm.bne("clear");

    asm.lda_imm(ENVELOPE_ATTACK_DECAY);
    asm.sta_abs(voice_register(config.voice, ATTACK_DECAY));
    asm.lda_imm(ENVELOPE_SUSTAIN_RELEASE);
    asm.sta_abs(voice_register(config.voice, SUSTAIN_RELEASE));
    asm.lda_imm(config.volume & 0x0F);
    asm.sta_abs(SID_BASE + MODE_VOLUME);
    // Falls through into rewind, whose RTS returns to the caller.

    asm.label("rewind")?;
    asm.lda_imm_lo("data");
    asm.sta_zp(ZP_CURSOR);
    asm.lda_imm_hi("data");
    asm.sta_zp(ZP_CURSOR + 1);
    asm.lda_imm((frames & 0x00FF) as u8);
    asm.sta_zp(ZP_REMAINING);
    asm.lda_imm((frames >> 8) as u8);
    asm.sta_zp(ZP_REMAINING + 1);
    asm.rts();

    asm.label("data")?;
    let program = asm.resolve()?;

    let image_size = program.code.len() + frame_count * 2;
    if config.load_address as usize + image_size > ADDRESS_SPACE {
        return Err(DriverError::ImageTooLarge {
            load_address: config.load_address,
            image_size,
        });
    }

    let init_address = program.origin;
    let play_address = program
        .address_of("play")
        .expect("play label is always defined");
    let data_address = program
        .address_of("data")
        .expect("data label is always defined");
    debug_assert_eq!(play_address, init_address + 3);

    Ok(Driver {
        code: program.code,
        init_address,
        play_address,
        data_address,
    })
}
