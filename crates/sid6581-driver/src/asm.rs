//! Minimal MOS 6510 assembler.
//!
//! Supports exactly the addressing modes the driver routine needs: an
//! origin, labels with forward references, absolute-word and branch-offset
//! fixups, and `#<label` / `#>label` immediates for pointer setup. Code is
//! emitted linearly; [`Assembler::resolve`] patches all references and
//! checks branch ranges.

use std::collections::HashMap;

use crate::error::{DriverError, Result};

/// What a recorded fixup patches once labels are known.
enum FixupKind {
    /// Two-byte little-endian absolute address.
    AbsoluteWord,
    /// One-byte signed displacement from the following instruction.
    BranchOffset,
    /// Low byte of the label address (`#<label`).
    ImmediateLow,
    /// High byte of the label address (`#>label`).
    ImmediateHigh,
}

struct Fixup {
    /// Offset of the byte(s) to patch, relative to the origin.
    location: usize,
    label: String,
    kind: FixupKind,
}

/// Single-pass 6510 code emitter with label fixups.
pub struct Assembler {
    origin: u16,
    code: Vec<u8>,
    labels: HashMap<String, u16>,
    fixups: Vec<Fixup>,
}

/// Fully resolved machine code with its label table.
pub struct Program {
    /// Address the code was assembled at.
    pub origin: u16,
    /// Emitted machine code.
    pub code: Vec<u8>,
    labels: HashMap<String, u16>,
}

impl Program {
    /// Address a label resolved to, if it was defined.
    pub fn address_of(&self, label: &str) -> Option<u16> {
        self.labels.get(label).copied()
    }
}

impl Assembler {
    /// Start assembling at `origin`.
    pub fn new(origin: u16) -> Self {
        Self {
            origin,
            code: Vec::new(),
            labels: HashMap::new(),
            fixups: Vec::new(),
        }
    }

    /// Current program counter.
    pub fn pc(&self) -> u16 {
        self.origin + self.code.len() as u16
    }

    /// Define `label` at the current program counter.
    pub fn label(&mut self, label: &str) -> Result<()> {
        if self.labels.contains_key(label) {
            return Err(DriverError::DuplicateLabel {
                label: label.into(),
            });
        }
        self.labels.insert(label.into(), self.pc());
        Ok(())
    }

    fn emit(&mut self, byte: u8) {
        self.code.push(byte);
    }

    fn emit_word(&mut self, word: u16) {
        let [lo, hi] = word.to_le_bytes();
        self.code.push(lo);
        self.code.push(hi);
    }

    fn fixup(&mut self, label: &str, kind: FixupKind) {
        self.fixups.push(Fixup {
            location: self.code.len(),
            label: label.into(),
            kind,
        });
    }

    /// `LDA #imm`
    pub fn lda_imm(&mut self, value: u8) {
        self.emit(0xA9);
        self.emit(value);
    }

    /// `LDA #<label`
    pub fn lda_imm_lo(&mut self, label: &str) {
        self.emit(0xA9);
        self.fixup(label, FixupKind::ImmediateLow);
        self.emit(0x00);
    }

    /// `LDA #>label`
    pub fn lda_imm_hi(&mut self, label: &str) {
        self.emit(0xA9);
        self.fixup(label, FixupKind::ImmediateHigh);
        self.emit(0x00);
    }

    /// `LDA zp`
    pub fn lda_zp(&mut self, address: u8) {
        self.emit(0xA5);
        self.emit(address);
    }

    /// `LDA (zp),Y`
    pub fn lda_ind_y(&mut self, address: u8) {
        self.emit(0xB1);
        self.emit(address);
    }

    /// `LDX #imm`
    pub fn ldx_imm(&mut self, value: u8) {
        self.emit(0xA2);
        self.emit(value);
    }

    /// `LDY #imm`
    pub fn ldy_imm(&mut self, value: u8) {
        self.emit(0xA0);
        self.emit(value);
    }

    /// `STA abs`
    pub fn sta_abs(&mut self, address: u16) {
        self.emit(0x8D);
        self.emit_word(address);
    }

    /// `STA abs,X`
    pub fn sta_abs_x(&mut self, address: u16) {
        self.emit(0x9D);
        self.emit_word(address);
    }

    /// `STA zp`
    pub fn sta_zp(&mut self, address: u8) {
        self.emit(0x85);
        self.emit(address);
    }

    /// `TAX`
    pub fn tax(&mut self) {
        self.emit(0xAA);
    }

    /// `INX`
    pub fn inx(&mut self) {
        self.emit(0xE8);
    }

    /// `INY`
    pub fn iny(&mut self) {
        self.emit(0xC8);
    }

    /// `CPX #imm`
    pub fn cpx_imm(&mut self, value: u8) {
        self.emit(0xE0);
        self.emit(value);
    }

    /// `CLC`
    pub fn clc(&mut self) {
        self.emit(0x18);
    }

    /// `ADC #imm`
    pub fn adc_imm(&mut self, value: u8) {
        self.emit(0x69);
        self.emit(value);
    }

    /// `ORA zp`
    pub fn ora_zp(&mut self, address: u8) {
        self.emit(0x05);
        self.emit(address);
    }

    /// `INC zp`
    pub fn inc_zp(&mut self, address: u8) {
        self.emit(0xE6);
        self.emit(address);
    }

    /// `DEC zp`
    pub fn dec_zp(&mut self, address: u8) {
        self.emit(0xC6);
        self.emit(address);
    }

    /// `BNE label`
    pub fn bne(&mut self, label: &str) {
        self.emit(0xD0);
        self.fixup(label, FixupKind::BranchOffset);
        self.emit(0x00);
    }

    /// `BEQ label`
    pub fn beq(&mut self, label: &str) {
        self.emit(0xF0);
        self.fixup(label, FixupKind::BranchOffset);
        self.emit(0x00);
    }

    /// `BCC label`
    pub fn bcc(&mut self, label: &str) {
        self.emit(0x90);
        self.fixup(label, FixupKind::BranchOffset);
        self.emit(0x00);
    }

    /// `JMP label`
    pub fn jmp(&mut self, label: &str) {
        self.emit(0x4C);
        self.fixup(label, FixupKind::AbsoluteWord);
        self.emit_word(0x0000);
    }

    /// `JSR label`
    pub fn jsr(&mut self, label: &str) {
        self.emit(0x20);
        self.fixup(label, FixupKind::AbsoluteWord);
        self.emit_word(0x0000);
    }

    /// `RTS`
    pub fn rts(&mut self) {
        self.emit(0x60);
    }

    /// Patch all fixups and hand out the finished program.
    pub fn resolve(mut self) -> Result<Program> {
        for fixup in &self.fixups {
            let target = *self.labels.get(&fixup.label).ok_or_else(|| {
                DriverError::UnboundLabel {
                    label: fixup.label.clone(),
                }
            })?;
            match fixup.kind {
                FixupKind::AbsoluteWord => {
                    let [lo, hi] = target.to_le_bytes();
                    self.code[fixup.location] = lo;
                    self.code[fixup.location + 1] = hi;
                }
                FixupKind::ImmediateLow => {
                    self.code[fixup.location] = target as u8;
                }
                FixupKind::ImmediateHigh => {
                    self.code[fixup.location] = (target >> 8) as u8;
                }
                FixupKind::BranchOffset => {
                    // Displacement is measured from the instruction after
                    // the offset byte.
                    let base = self.origin as i32 + fixup.location as i32 + 1;
                    let distance = target as i32 - base;
                    if !(-128..=127).contains(&distance) {
                        return Err(DriverError::BranchOutOfRange {
                            label: fixup.label.clone(),
                            distance,
                        });
                    }
                    self.code[fixup.location] = distance as i8 as u8;
                }
            }
        }
        Ok(Program {
            origin: self.origin,
            code: self.code,
            labels: self.labels,
        })
    }
}
