//! WAV input and monophonic pitch tracking.
//!
//! This crate covers the analysis half of the WAV-to-SID pipeline:
//! - Decoding a WAV file into a mono float sample buffer
//! - Estimating one fundamental frequency per analysis hop (sliding
//!   Hann-windowed FFT, magnitude peak with parabolic interpolation)
//! - A [`PitchTrack`] model that external pitch estimates can also be fed
//!   into directly, and that retimes the hop-rate contour onto a driver's
//!   frame tick grid
//!
//! # Example
//! ```no_run
//! use sid6581_pitch::{load_wav, PitchTracker};
//!
//! # fn main() -> sid6581_pitch::Result<()> {
//! let waveform = load_wav("melody.wav")?;
//! let track = PitchTracker::default().track(&waveform)?;
//! println!(
//!     "{} frames, {:.1}% voiced",
//!     track.len(),
//!     track.voiced_ratio() * 100.0
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod frame;
pub mod track;
pub mod tracker;
pub mod wav;

pub use error::{PitchError, Result};
pub use frame::PitchFrame;
pub use track::PitchTrack;
pub use tracker::PitchTracker;
pub use wav::{load_wav, Waveform};
