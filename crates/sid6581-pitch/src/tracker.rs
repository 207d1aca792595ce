//! STFT magnitude-peak pitch tracker.
//!
//! Estimates one fundamental frequency per hop by taking a Hann-windowed
//! forward FFT and picking the strongest magnitude bin inside the
//! configured frequency band. Parabolic interpolation over the peak and its
//! neighbours refines the estimate well below bin resolution, which matters
//! here: at 44.1 kHz and 2048-point frames a bin is ~21.5 Hz wide, a clearly
//! audible step for a melody line.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::{PitchError, Result};
use crate::track::PitchTrack;
use crate::wav::Waveform;

/// Default analysis frame length in samples.
pub const DEFAULT_FRAME_LENGTH: usize = 2048;

/// Default hop between analysis frames in samples.
pub const DEFAULT_HOP_LENGTH: usize = 512;

/// Default lower bound of the search band in Hz.
pub const DEFAULT_FMIN: f64 = 50.0;

/// Default upper bound of the search band in Hz.
pub const DEFAULT_FMAX: f64 = 2000.0;

/// Peaks weaker than a sine of this amplitude count as silence.
const SILENCE_FLOOR_AMPLITUDE: f32 = 1e-3;

/// Sliding-window pitch estimator.
///
/// The frequency band `[fmin, fmax]` restricts the peak search so strong
/// harmonics above the melody range or rumble below it cannot win.
#[derive(Clone, Copy, Debug)]
pub struct PitchTracker {
    /// Analysis frame length in samples (FFT size).
    pub frame_length: usize,
    /// Hop between consecutive frames in samples.
    pub hop_length: usize,
    /// Lowest frequency considered a pitch candidate, in Hz.
    pub fmin: f64,
    /// Highest frequency considered a pitch candidate, in Hz.
    pub fmax: f64,
}

impl Default for PitchTracker {
    fn default() -> Self {
        Self {
            frame_length: DEFAULT_FRAME_LENGTH,
            hop_length: DEFAULT_HOP_LENGTH,
            fmin: DEFAULT_FMIN,
            fmax: DEFAULT_FMAX,
        }
    }
}

impl PitchTracker {
    /// Estimate the pitch contour of `waveform`.
    ///
    /// Produces one frame per hop while sample data remains, zero-padding
    /// the final frames; frame `i` is stamped at `i * hop / sample_rate`
    /// seconds. Frames whose strongest in-band component falls below the
    /// silence floor report 0.0 Hz.
    pub fn track(&self, waveform: &Waveform) -> Result<PitchTrack> {
        self.validate(waveform.sample_rate)?;

        let sample_rate = waveform.sample_rate as f64;
        let bin_width = sample_rate / self.frame_length as f64;
        let nyquist_bin = self.frame_length / 2;
        // Peak search band in bins, keeping a neighbour on each side for
        // the interpolation below.
        let bin_min = ((self.fmin / bin_width).ceil() as usize).max(1);
        let bin_max = ((self.fmax.min(sample_rate / 2.0) / bin_width).floor() as usize)
            .min(nyquist_bin - 1);
        if bin_min > bin_max {
            return Err(PitchError::InvalidConfig {
                msg: format!(
                    "band [{}, {}] Hz holds no FFT bin at {} Hz sample rate",
                    self.fmin, self.fmax, waveform.sample_rate
                ),
            });
        }

        let window = hann_window(self.frame_length);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(self.frame_length);
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.frame_length];
        let peak_floor = SILENCE_FLOOR_AMPLITUDE * self.frame_length as f32 / 4.0;

        let samples = &waveform.samples;
        let mut frequencies = Vec::new();
        let mut times = Vec::new();
        let mut start = 0usize;
        while start < samples.len() {
            let available = (samples.len() - start).min(self.frame_length);
            for (i, slot) in buffer.iter_mut().enumerate() {
                let sample = if i < available { samples[start + i] } else { 0.0 };
                *slot = Complex::new(sample * window[i], 0.0);
            }
            fft.process(&mut buffer);

            let mut peak_bin = bin_min;
            let mut peak_magnitude = 0.0f32;
            for bin in bin_min..=bin_max {
                let magnitude = buffer[bin].norm();
                if magnitude > peak_magnitude {
                    peak_magnitude = magnitude;
                    peak_bin = bin;
                }
            }

            let frequency = if peak_magnitude < peak_floor {
                0.0
            } else {
                let delta = parabolic_offset(
                    buffer[peak_bin - 1].norm(),
                    peak_magnitude,
                    buffer[peak_bin + 1].norm(),
                );
                (peak_bin as f64 + delta) * bin_width
            };

            frequencies.push(frequency);
            times.push(start as f64 / sample_rate);
            start += self.hop_length;
        }

        PitchTrack::from_estimates(frequencies, times)
    }

    fn validate(&self, sample_rate: u32) -> Result<()> {
        if self.frame_length < 4 || self.hop_length == 0 {
            return Err(PitchError::InvalidConfig {
                msg: format!(
                    "frame length {} / hop length {} out of range",
                    self.frame_length, self.hop_length
                ),
            });
        }
        if sample_rate == 0 {
            return Err(PitchError::InvalidConfig {
                msg: "sample rate must be positive".into(),
            });
        }
        if !(self.fmin > 0.0 && self.fmax > self.fmin) {
            return Err(PitchError::InvalidConfig {
                msg: format!("need 0 < fmin < fmax, got [{}, {}]", self.fmin, self.fmax),
            });
        }
        Ok(())
    }
}

/// Periodic Hann window of length `n`.
fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / n as f32).cos()))
        .collect()
}

/// Sub-bin peak offset from the three magnitudes around a spectral peak.
///
/// Standard quadratic vertex fit; the result is clamped to half a bin so a
/// degenerate neighbourhood can never move the estimate out of the bin.
fn parabolic_offset(left: f32, center: f32, right: f32) -> f64 {
    let denominator = left - 2.0 * center + right;
    if denominator.abs() < f32::EPSILON {
        return 0.0;
    }
    let offset = 0.5 * (left - right) / denominator;
    offset.clamp(-0.5, 0.5) as f64
}
