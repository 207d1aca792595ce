//! Executes synthesized drivers on a small 6510 stepper and checks the
//! register write sequence the SID would see.

use sid6581::registers::{voice_register, CONTROL, FREQ_HI, FREQ_LO, MODE_VOLUME, SID_BASE};
use sid6581_driver::{synthesize, Driver, DriverConfig};

/// Interpreter for exactly the instruction set the driver uses.
struct Stepper {
    ram: [u8; 0x1_0000],
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    pc: u16,
    carry: bool,
    zero: bool,
    /// Writes into the SID register window, in order.
    sid_writes: Vec<(u16, u8)>,
}

/// Return address sentinel: `run` stops when an RTS pops it.
const SENTINEL: u16 = 0xFFFF;

impl Stepper {
    fn new(driver: &Driver, words: &[u16]) -> Self {
        let mut ram = [0u8; 0x1_0000];
        let base = driver.init_address as usize;
        ram[base..base + driver.code.len()].copy_from_slice(&driver.code);
        let mut cursor = driver.data_address as usize;
        for word in words {
            let [lo, hi] = word.to_le_bytes();
            ram[cursor] = lo;
            ram[cursor + 1] = hi;
            cursor += 2;
        }
        Self {
            ram,
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            pc: 0,
            carry: false,
            zero: false,
            sid_writes: Vec::new(),
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        self.ram[address as usize] = value;
        if (SID_BASE..SID_BASE + 0x19).contains(&address) {
            self.sid_writes.push((address, value));
        }
    }

    fn push(&mut self, value: u8) {
        self.ram[0x0100 + self.sp as usize] = value;
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.ram[0x0100 + self.sp as usize]
    }

    fn fetch(&mut self) -> u8 {
        let byte = self.ram[self.pc as usize];
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch();
        let hi = self.fetch();
        u16::from_le_bytes([lo, hi])
    }

    fn set_nz(&mut self, value: u8) {
        self.zero = value == 0;
    }

    fn branch(&mut self, taken: bool) {
        let offset = self.fetch() as i8;
        if taken {
            self.pc = self.pc.wrapping_add_signed(offset as i16);
        }
    }

    /// Run the subroutine at `address` until it returns.
    fn call(&mut self, address: u16) {
        let [lo, hi] = (SENTINEL - 1).to_le_bytes();
        self.push(hi);
        self.push(lo);
        self.pc = address;
        for _ in 0..100_000 {
            if self.pc == SENTINEL {
                return;
            }
            self.step();
        }
        panic!("driver routine did not return");
    }

    fn step(&mut self) {
        let opcode = self.fetch();
        match opcode {
            0xA9 => {
                self.a = self.fetch();
                self.set_nz(self.a);
            }
            0xA5 => {
                let zp = self.fetch();
                self.a = self.ram[zp as usize];
                self.set_nz(self.a);
            }
            0xB1 => {
                let zp = self.fetch() as usize;
                let base = u16::from_le_bytes([self.ram[zp], self.ram[zp + 1]]);
                self.a = self.ram[base.wrapping_add(self.y as u16) as usize];
                self.set_nz(self.a);
            }
            0xA2 => {
                self.x = self.fetch();
                self.set_nz(self.x);
            }
            0xA0 => {
                self.y = self.fetch();
                self.set_nz(self.y);
            }
            0x8D => {
                let address = self.fetch_word();
                let value = self.a;
                self.write(address, value);
            }
            0x9D => {
                let address = self.fetch_word().wrapping_add(self.x as u16);
                let value = self.a;
                self.write(address, value);
            }
            0x85 => {
                let zp = self.fetch();
                let value = self.a;
                self.write(zp as u16, value);
            }
            0xAA => {
                self.x = self.a;
                self.set_nz(self.x);
            }
            0xE8 => {
                self.x = self.x.wrapping_add(1);
                self.set_nz(self.x);
            }
            0xC8 => {
                self.y = self.y.wrapping_add(1);
                self.set_nz(self.y);
            }
            0xE0 => {
                let value = self.fetch();
                self.carry = self.x >= value;
                self.zero = self.x == value;
            }
            0x18 => self.carry = false,
            0x69 => {
                let value = self.fetch();
                let sum = self.a as u16 + value as u16 + self.carry as u16;
                self.carry = sum > 0xFF;
                self.a = sum as u8;
                self.set_nz(self.a);
            }
            0x05 => {
                let zp = self.fetch();
                self.a |= self.ram[zp as usize];
                self.set_nz(self.a);
            }
            0xE6 => {
                let zp = self.fetch();
                let value = self.ram[zp as usize].wrapping_add(1);
                self.ram[zp as usize] = value;
                self.set_nz(value);
            }
            0xC6 => {
                let zp = self.fetch();
                let value = self.ram[zp as usize].wrapping_sub(1);
                self.ram[zp as usize] = value;
                self.set_nz(value);
            }
            0xD0 => self.branch(!self.zero),
            0xF0 => self.branch(self.zero),
            0x90 => self.branch(!self.carry),
            0x4C => self.pc = self.fetch_word(),
            0x20 => {
                let target = self.fetch_word();
                let ret = self.pc.wrapping_sub(1);
                let [lo, hi] = ret.to_le_bytes();
                self.push(hi);
                self.push(lo);
                self.pc = target;
            }
            0x60 => {
                let lo = self.pop();
                let hi = self.pop();
                self.pc = u16::from_le_bytes([lo, hi]).wrapping_add(1);
            }
            other => panic!("driver emitted unexpected opcode {other:#04x}"),
        }
    }

    /// SID writes recorded by one call to `address`.
    fn record_call(&mut self, address: u16) -> Vec<(u16, u8)> {
        let mark = self.sid_writes.len();
        self.call(address);
        self.sid_writes[mark..].to_vec()
    }
}

#[test]
fn init_clears_the_chip_and_programs_envelope_and_volume() {
    let config = DriverConfig::default();
    let driver = synthesize(&config, 4).unwrap();
    let mut cpu = Stepper::new(&driver, &[100, 200, 300, 400]);

    let writes = cpu.record_call(driver.init_address);
    // First 25 writes zero every register in ascending order.
    assert_eq!(writes.len(), 25 + 3);
    for (i, &(address, value)) in writes[..25].iter().enumerate() {
        assert_eq!(address, SID_BASE + i as u16);
        assert_eq!(value, 0);
    }
    // Then envelope and master volume.
    assert_eq!(writes[25], (0xD405, 0x00));
    assert_eq!(writes[26], (0xD406, 0xF0));
    assert_eq!(writes[27], (SID_BASE + MODE_VOLUME, 0x0F));
}

#[test]
fn each_tick_writes_freq_pair_then_gate_atomically() {
    let config = DriverConfig::default();
    let driver = synthesize(&config, 3).unwrap();
    let words = [0x1D45u16, 0x0000, 0xBEEF];
    let mut cpu = Stepper::new(&driver, &words);
    cpu.call(driver.init_address);

    for &word in &words {
        let writes = cpu.record_call(driver.play_address);
        let [lo, hi] = word.to_le_bytes();
        // Exactly three writes per tick, low byte first, gate last; both
        // frequency bytes land inside the same call.
        assert_eq!(
            writes,
            vec![
                (voice_register(0, FREQ_LO), lo),
                (voice_register(0, FREQ_HI), hi),
                (voice_register(0, CONTROL), 0x11),
            ]
        );
    }
}

#[test]
fn looping_driver_rewinds_to_the_first_frame() {
    let config = DriverConfig::default();
    let driver = synthesize(&config, 2).unwrap();
    let mut cpu = Stepper::new(&driver, &[1111, 2222]);
    cpu.call(driver.init_address);

    cpu.call(driver.play_address);
    cpu.call(driver.play_address);
    // Stream exhausted: the third tick must wrap around to word 0.
    let writes = cpu.record_call(driver.play_address);
    let [lo, hi] = 1111u16.to_le_bytes();
    assert_eq!(writes[0], (voice_register(0, FREQ_LO), lo));
    assert_eq!(writes[1], (voice_register(0, FREQ_HI), hi));
    // And the fourth continues with word 1.
    let writes = cpu.record_call(driver.play_address);
    let [lo, hi] = 2222u16.to_le_bytes();
    assert_eq!(writes[0], (voice_register(0, FREQ_LO), lo));
    assert_eq!(writes[1], (voice_register(0, FREQ_HI), hi));
}

#[test]
fn halting_driver_releases_the_gate_and_stays_silent() {
    let config = DriverConfig {
        loop_playback: false,
        ..DriverConfig::default()
    };
    let driver = synthesize(&config, 2).unwrap();
    let mut cpu = Stepper::new(&driver, &[1111, 2222]);
    cpu.call(driver.init_address);

    cpu.call(driver.play_address);
    cpu.call(driver.play_address);
    // Ticks past the end only drop the gate, no frequency writes.
    for _ in 0..3 {
        let writes = cpu.record_call(driver.play_address);
        assert_eq!(writes, vec![(voice_register(0, CONTROL), 0x10)]);
    }
}

#[test]
fn empty_looping_stream_settles_into_silence() {
    let driver = synthesize(&DriverConfig::default(), 0).unwrap();
    let mut cpu = Stepper::new(&driver, &[]);
    cpu.call(driver.init_address);
    let writes = cpu.record_call(driver.play_address);
    assert_eq!(writes, vec![(voice_register(0, CONTROL), 0x10)]);
}

#[test]
fn driver_targets_the_configured_voice() {
    let config = DriverConfig {
        voice: 1,
        ..DriverConfig::default()
    };
    let driver = synthesize(&config, 1).unwrap();
    let mut cpu = Stepper::new(&driver, &[4242]);
    cpu.call(driver.init_address);

    let writes = cpu.record_call(driver.play_address);
    let [lo, hi] = 4242u16.to_le_bytes();
    assert_eq!(
        writes,
        vec![(0xD407, lo), (0xD408, hi), (0xD40B, 0x11)]
    );
}

#[test]
fn long_stream_crosses_page_boundaries_correctly() {
    // 200 words span beyond one 256-byte page from the data start.
    let words: Vec<u16> = (0..200).map(|i| 40 + i as u16 * 3).collect();
    let driver = synthesize(&DriverConfig::default(), words.len()).unwrap();
    let mut cpu = Stepper::new(&driver, &words);
    cpu.call(driver.init_address);

    for &word in &words {
        let writes = cpu.record_call(driver.play_address);
        let [lo, hi] = word.to_le_bytes();
        assert_eq!(writes[0].1, lo, "low byte mismatch at word {word}");
        assert_eq!(writes[1].1, hi, "high byte mismatch at word {word}");
    }
}
