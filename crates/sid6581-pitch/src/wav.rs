//! WAV input decoding.
//!
//! The conversion pipeline's input boundary is an uncompressed WAV file;
//! anything else (MP3, OGG, ...) is expected to be transcoded by an
//! external tool first. Decoding normalizes every supported sample format
//! to mono `f32` in [-1, 1].

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::{PitchError, Result};

/// Decoded mono waveform.
#[derive(Clone, Debug)]
pub struct Waveform {
    /// Samples normalized to [-1, 1].
    pub samples: Vec<f32>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl Waveform {
    /// Duration of the waveform in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Load a WAV file and downmix it to mono.
///
/// Integer formats up to 32 bits and 32-bit float are supported; integer
/// samples are scaled by their nominal full-scale value. Multi-channel
/// files are averaged into one channel. Unreadable or malformed input
/// fails fast, before any conversion output is produced.
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(PitchError::UnsupportedWaveform {
            msg: "WAV declares zero channels".into(),
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                return Err(PitchError::UnsupportedWaveform {
                    msg: format!("{}-bit integer samples", spec.bits_per_sample),
                });
            }
            let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / full_scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let samples = downmix(&interleaved, spec.channels as usize);
    Ok(Waveform {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Average interleaved channels into one.
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hound::{WavSpec, WavWriter};

    fn write_test_wav(spec: WavSpec, frames: &[(i16, i16)]) -> tempfile::TempPath {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        let path = file.into_temp_path();
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for &(left, right) in frames {
            writer.write_sample(left).unwrap();
            if spec.channels == 2 {
                writer.write_sample(right).unwrap();
            }
        }
        writer.finalize().unwrap();
        path
    }

    #[test]
    fn loads_and_downmixes_stereo_i16() {
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let path = write_test_wav(spec, &[(16_384, -16_384), (8_192, 8_192)]);
        let waveform = load_wav(&path).unwrap();
        assert_eq!(waveform.sample_rate, 22_050);
        assert_eq!(waveform.samples.len(), 2);
        // Opposite half-scale channels cancel out.
        assert_relative_eq!(waveform.samples[0], 0.0, epsilon = 1e-6);
        assert_relative_eq!(waveform.samples[1], 0.25, epsilon = 1e-6);
    }

    #[test]
    fn scales_mono_i16_to_unit_range() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let path = write_test_wav(spec, &[(i16::MIN, 0), (0, 0), (i16::MAX, 0)]);
        let waveform = load_wav(&path).unwrap();
        assert_relative_eq!(waveform.samples[0], -1.0, epsilon = 1e-6);
        assert_relative_eq!(waveform.samples[1], 0.0, epsilon = 1e-6);
        assert_relative_eq!(waveform.samples[2], 1.0, epsilon = 1e-4);
        assert_relative_eq!(waveform.duration_seconds(), 3.0 / 44_100.0, epsilon = 1e-9);
    }

    #[test]
    fn missing_file_fails_fast() {
        let result = load_wav("/nonexistent/input.wav");
        assert!(result.is_err());
    }

    #[test]
    fn garbage_bytes_are_not_a_waveform() {
        let file = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        std::fs::write(file.path(), b"definitely not RIFF data").unwrap();
        assert!(matches!(
            load_wav(file.path()),
            Err(PitchError::WavDecode(_))
        ));
    }
}
