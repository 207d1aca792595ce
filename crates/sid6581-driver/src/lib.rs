//! 6510 driver synthesizer.
//!
//! A PSID container is only music once it carries code the C64 can run:
//! the player environment calls the header's init vector once and the play
//! vector once per video frame, and everything audible happens inside
//! those calls. This crate assembles that routine for a quantized
//! frequency stream: per frame it fetches the next 16-bit oscillator word,
//! writes it into the selected voice's frequency register pair, and keeps
//! the gate open; at end of stream it either rewinds (loop) or releases
//! the gate (halt).
//!
//! # Example
//! ```
//! use sid6581_driver::{synthesize, DriverConfig};
//!
//! let driver = synthesize(&DriverConfig::default(), 1500).unwrap();
//! assert_eq!(driver.init_address, 0x1000);
//! assert_eq!(driver.play_address, 0x1003);
//! assert_eq!(driver.data_address as usize, 0x1000 + driver.code.len());
//! ```

#![warn(missing_docs)]

pub mod asm;
pub mod error;
pub mod synth;

pub use asm::{Assembler, Program};
pub use error::{DriverError, Result};
pub use synth::{synthesize, Driver, DriverConfig};
