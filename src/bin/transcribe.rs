use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};

use transcribe::common::{cents_offset, F32ArrayExt};
use transcribe::{
    AudioClip, MpmConfig, MpmPitchDetector, NoteTable, Plotter, SvgPlotter, Transcriber,
    DEFAULT_INCREMENT_MS, NOTE_TABLE,
};

/// Transcribes a monophonic recording into a note-vs-time plot.
#[derive(Parser, Debug)]
#[command(name = "transcribe", version, about)]
struct Args {
    /// WAV file to transcribe
    input: PathBuf,

    /// Window duration in milliseconds
    #[arg(long, default_value_t = DEFAULT_INCREMENT_MS)]
    increment_ms: u32,

    /// Fraction of the strongest NSDF peak a shorter period must reach to be selected
    #[arg(long, default_value_t = transcribe::mpm::DEFAULT_CUTOFF_RATIO)]
    cutoff_ratio: f32,

    /// Minimum NSDF peak value for a period candidate
    #[arg(long, default_value_t = transcribe::mpm::DEFAULT_SMALL_AMPLITUDE_THRESHOLD)]
    small_cutoff: f32,

    /// Lowest reported pitch in Hz
    #[arg(long, default_value_t = transcribe::mpm::DEFAULT_LOWER_PITCH_CUTOFF)]
    lower_pitch_cutoff: f32,

    /// JSON object mapping note names to frequencies, replacing the built in equal tempered notes
    #[arg(long)]
    note_map: Option<PathBuf>,

    /// Directory to write the plot to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the transcription as JSON
    #[arg(long)]
    json: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let custom_notes = match &args.note_map {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open note map {}", path.display()))?;
            let table = NoteTable::from_json(BufReader::new(file))
                .with_context(|| format!("failed to load note map {}", path.display()))?;
            Some(table)
        }
        None => None,
    };
    let notes: &NoteTable = custom_notes.as_ref().unwrap_or(&NOTE_TABLE);

    let clip = AudioClip::open(&args.input)
        .with_context(|| format!("failed to decode {}", args.input.display()))?;
    info!(
        "{}: {:.2} s at {} Hz, peak {:.1} dB",
        clip.name(),
        clip.duration_seconds(),
        clip.sample_rate(),
        clip.samples().peak_level_db()
    );

    let config = MpmConfig {
        cutoff_ratio: args.cutoff_ratio,
        small_amplitude_threshold: args.small_cutoff,
        lower_pitch_cutoff: args.lower_pitch_cutoff,
    };
    let detector = MpmPitchDetector::from_config(config).context("invalid detector options")?;
    let mut transcriber = Transcriber::new(detector, notes);
    let transcription = transcriber
        .transcribe(clip.samples(), clip.sample_rate(), args.increment_ms)
        .context("transcription failed")?;

    for entry in transcription.iter() {
        if let Some(note) = notes.get(&entry.note) {
            debug!(
                "{:>8} ms {:>4} {:+.0} cents ({:.2} Hz)",
                entry.timestamp_ms,
                entry.note,
                cents_offset(entry.frequency, note.frequency),
                entry.frequency
            );
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&transcription)?);
    }

    let plotter = SvgPlotter::new(&args.output_dir);
    let plot_path = plotter
        .plot(clip.name(), &transcription, notes)
        .with_context(|| format!("failed to write plot to {}", args.output_dir.display()))?;
    println!("Plotted transcription result to '{}'", plot_path.display());
    Ok(())
}
