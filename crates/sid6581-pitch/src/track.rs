//! Pitch track model.
//!
//! A [`PitchTrack`] holds the per-hop frequency contour of one analysis run.
//! It is the seam between pitch estimation and register encoding: the
//! tracker in this crate produces one, but externally computed estimate
//! arrays can be adapted through [`PitchTrack::from_estimates`] as well.

use crate::error::{PitchError, Result};
use crate::frame::PitchFrame;

/// Finite, ordered sequence of pitch estimates.
///
/// Estimates are sanitized on construction: any non-finite or negative
/// frequency becomes 0.0 (unvoiced). This transformation is part of the
/// contract, so no NaN or spurious negative pitch ever reaches the register
/// quantizer downstream.
#[derive(Clone, Debug, Default)]
pub struct PitchTrack {
    frequencies: Vec<f64>,
    times: Vec<f64>,
}

impl PitchTrack {
    /// Build a track from parallel estimate/timestamp arrays.
    ///
    /// The arrays must have equal length and `times` must be ascending;
    /// timestamps are expected in seconds. Invalid frequency estimates
    /// (NaN, infinities, negatives) are normalized to 0.0.
    pub fn from_estimates(frequencies: Vec<f64>, times: Vec<f64>) -> Result<Self> {
        if frequencies.len() != times.len() {
            return Err(PitchError::ShapeMismatch {
                frequencies: frequencies.len(),
                times: times.len(),
            });
        }
        if times.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(PitchError::InvalidConfig {
                msg: "frame timestamps must be strictly ascending".into(),
            });
        }
        let frequencies = frequencies.into_iter().map(normalize_estimate).collect();
        Ok(Self { frequencies, times })
    }

    /// Number of frames in the track.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether the track holds no frames at all.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterate the frames in ascending index order.
    ///
    /// The iterator is lazy and borrows the track, so it can be restarted
    /// by calling `frames()` again.
    pub fn frames(&self) -> impl Iterator<Item = PitchFrame> + '_ {
        self.frequencies
            .iter()
            .zip(&self.times)
            .enumerate()
            .map(|(index, (&frequency_hz, &time_seconds))| PitchFrame {
                index,
                time_seconds,
                frequency_hz,
            })
    }

    /// Track duration in seconds: last frame time plus one hop.
    ///
    /// The hop is inferred from the first timestamp pair; a single-frame
    /// track reports zero duration.
    pub fn duration_seconds(&self) -> f64 {
        match self.times.len() {
            0 | 1 => 0.0,
            len => {
                let hop = self.times[1] - self.times[0];
                self.times[len - 1] + hop
            }
        }
    }

    /// Fraction of frames carrying a pitch, in [0, 1].
    pub fn voiced_ratio(&self) -> f64 {
        if self.frequencies.is_empty() {
            return 0.0;
        }
        let voiced = self.frequencies.iter().filter(|&&hz| hz > 0.0).count();
        voiced as f64 / self.frequencies.len() as f64
    }

    /// Retime the contour onto a fixed tick grid.
    ///
    /// Produces one frequency per driver tick covering the track duration,
    /// picking the source frame closest in time to each tick. Source order
    /// is preserved (tick times and frame times both ascend); a non-empty
    /// track yields at least one tick.
    pub fn resampled(&self, tick_rate_hz: f64) -> Vec<f64> {
        if self.is_empty() || tick_rate_hz <= 0.0 {
            return Vec::new();
        }
        let ticks = ((self.duration_seconds() * tick_rate_hz).ceil() as usize).max(1);
        (0..ticks)
            .map(|tick| {
                let time = tick as f64 / tick_rate_hz;
                self.frequencies[self.nearest_frame(time)]
            })
            .collect()
    }

    /// Index of the frame whose timestamp is closest to `time`.
    fn nearest_frame(&self, time: f64) -> usize {
        let upper = self.times.partition_point(|&t| t < time);
        if upper == 0 {
            return 0;
        }
        if upper == self.times.len() {
            return upper - 1;
        }
        let below = upper - 1;
        if time - self.times[below] <= self.times[upper] - time {
            below
        } else {
            upper
        }
    }
}

fn normalize_estimate(hz: f64) -> f64 {
    if hz.is_finite() && hz > 0.0 {
        hz
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hop_times(count: usize, hop: f64) -> Vec<f64> {
        (0..count).map(|i| i as f64 * hop).collect()
    }

    #[test]
    fn rejects_mismatched_arrays() {
        let result = PitchTrack::from_estimates(vec![440.0], vec![0.0, 0.1]);
        assert!(matches!(
            result,
            Err(PitchError::ShapeMismatch {
                frequencies: 1,
                times: 2
            })
        ));
    }

    #[test]
    fn rejects_unordered_timestamps() {
        let result = PitchTrack::from_estimates(vec![440.0, 441.0], vec![0.1, 0.1]);
        assert!(matches!(result, Err(PitchError::InvalidConfig { .. })));
    }

    #[test]
    fn normalizes_invalid_estimates_to_silence() {
        let track = PitchTrack::from_estimates(
            vec![440.0, f64::NAN, -20.0, f64::INFINITY, 0.0],
            hop_times(5, 0.01),
        )
        .unwrap();
        let frequencies: Vec<f64> = track.frames().map(|f| f.frequency_hz).collect();
        assert_eq!(frequencies, vec![440.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(track.voiced_ratio(), 0.2);
    }

    #[test]
    fn frames_iterate_in_order_and_restart() {
        let track =
            PitchTrack::from_estimates(vec![100.0, 200.0, 300.0], hop_times(3, 0.5)).unwrap();
        let indices: Vec<usize> = track.frames().map(|f| f.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        // A second pass starts over at frame 0.
        let first = track.frames().next().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.frequency_hz, 100.0);
        assert!(first.is_voiced());
    }

    #[test]
    fn duration_covers_trailing_hop() {
        let track = PitchTrack::from_estimates(vec![0.0; 4], hop_times(4, 0.25)).unwrap();
        assert_eq!(track.duration_seconds(), 1.0);
        assert_eq!(PitchTrack::default().duration_seconds(), 0.0);
    }

    #[test]
    fn resampled_picks_nearest_frames_in_order() {
        // 4 frames at 10 Hz hop rate, retimed to 20 Hz ticks: each source
        // frame should appear twice.
        let track =
            PitchTrack::from_estimates(vec![100.0, 200.0, 300.0, 400.0], hop_times(4, 0.1))
                .unwrap();
        let ticks = track.resampled(20.0);
        assert_eq!(ticks.len(), 8);
        assert_eq!(ticks[0], 100.0);
        assert_eq!(ticks[2], 200.0);
        assert_eq!(ticks[7], 400.0);
        // Order is preserved.
        let mut last = 0.0;
        for hz in ticks {
            assert!(hz >= last);
            last = hz;
        }
    }

    #[test]
    fn resampled_empty_track_is_empty() {
        assert!(PitchTrack::default().resampled(50.0).is_empty());
    }
}
