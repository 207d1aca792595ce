//! Convert a monophonic WAV recording into a playable PSID v2 file.
//!
//! Pipeline: decode the WAV, track the pitch contour, retime it to the
//! target machine's frame rate, quantize to oscillator words, synthesize
//! the 6510 play routine, and write the container atomically. The run
//! either produces a complete valid file or reports an error; there is no
//! partial output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use sid6581::{freq_to_register, ChipProfile};
use sid6581_driver::{synthesize, DriverConfig};
use sid6581_pitch::{load_wav, PitchTracker};
use sid6581_psid::{write_psid_file, PsidFlags, PsidHeader, HEADER_SIZE};

#[derive(Parser)]
#[command(name = "wav2sid")]
#[command(about = "Convert a monophonic WAV file to a C64 PSID tune")]
struct Args {
    /// Input WAV file
    input: PathBuf,

    /// Output SID file (default: input with .sid extension)
    output: Option<PathBuf>,

    /// Target chip: 6581 (PAL) or 8580 (NTSC); unknown names fall back to 6581
    #[arg(long, default_value = "6581")]
    chip: String,

    /// Analysis hop length in samples
    #[arg(long, default_value_t = 512)]
    hop_length: usize,

    /// Analysis frame length in samples
    #[arg(long, default_value_t = 2048)]
    frame_length: usize,

    /// Lowest pitch candidate in Hz
    #[arg(long, default_value_t = 50.0)]
    fmin: f64,

    /// Highest pitch candidate in Hz
    #[arg(long, default_value_t = 2000.0)]
    fmax: f64,

    /// Title metadata (default: input file name without extension)
    #[arg(long)]
    title: Option<String>,

    /// Author metadata
    #[arg(long, default_value = "")]
    author: String,

    /// Release metadata
    #[arg(long, default_value = "")]
    released: String,

    /// Voice (0-2) the driver plays on
    #[arg(long, default_value_t = 0)]
    voice: u8,

    /// Halt with a released gate at end of stream instead of looping
    #[arg(long)]
    no_loop: bool,
}

fn main() -> Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    let profile = ChipProfile::resolve(&args.chip);
    let tick_rate = profile.tick_rate();

    let waveform = load_wav(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    println!(
        "Loaded {}: {:.1}s at {} Hz",
        args.input.display(),
        waveform.duration_seconds(),
        waveform.sample_rate
    );

    let tracker = PitchTracker {
        frame_length: args.frame_length,
        hop_length: args.hop_length,
        fmin: args.fmin,
        fmax: args.fmax,
    };
    let track = tracker
        .track(&waveform)
        .context("pitch analysis failed")?;
    println!(
        "Tracked {} frames, {:.0}% voiced",
        track.len(),
        track.voiced_ratio() * 100.0
    );

    // One frequency word per driver tick (vertical blank).
    let contour = track.resampled(tick_rate as f64);
    let words: Vec<u16> = contour
        .iter()
        .map(|&hz| freq_to_register(hz, profile))
        .collect();

    let config = DriverConfig {
        voice: args.voice,
        loop_playback: !args.no_loop,
        ..DriverConfig::default()
    };
    let driver = synthesize(&config, words.len()).context("driver synthesis failed")?;

    let header = PsidHeader {
        load_address: config.load_address,
        init_address: driver.init_address,
        play_address: driver.play_address,
        title: args
            .title
            .clone()
            .unwrap_or_else(|| default_title(&args.input)),
        author: args.author.clone(),
        released: args.released.clone(),
        flags: PsidFlags::for_profile(profile),
        ..PsidHeader::default()
    };

    write_psid_file(&output, &header, &driver.code, &words)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let file_size = HEADER_SIZE + driver.code.len() + words.len() * 2;
    println!(
        "Wrote {} ({} bytes): {}/{}, {} frames at {} Hz, {} at end",
        output.display(),
        file_size,
        profile.model.as_str(),
        match profile.video {
            sid6581::VideoStandard::Pal => "PAL",
            sid6581::VideoStandard::Ntsc => "NTSC",
        },
        words.len(),
        tick_rate,
        if args.no_loop { "halting" } else { "looping" }
    );
    Ok(())
}

/// Default output path: the input with its extension replaced by `.sid`.
fn default_output(input: &Path) -> PathBuf {
    input.with_extension("sid")
}

/// Default title: the input file name without its extension.
fn default_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_replaces_the_extension() {
        assert_eq!(
            default_output(Path::new("/tmp/melody.wav")),
            PathBuf::from("/tmp/melody.sid")
        );
        assert_eq!(
            default_output(Path::new("melody")),
            PathBuf::from("melody.sid")
        );
    }

    #[test]
    fn title_defaults_to_the_file_stem() {
        assert_eq!(default_title(Path::new("/tmp/melody.wav")), "melody");
        assert_eq!(default_title(Path::new("tune.take2.wav")), "tune.take2");
    }
}
