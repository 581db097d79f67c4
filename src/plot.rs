//! Rendering of transcriptions as time/note scatter plots.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use log::info;

use crate::error::Result;
use crate::notes::NoteTable;
use crate::transcriber::Transcription;

/// Renders a transcription to a file and returns the path of that file.
pub trait Plotter {
    fn plot(&self, name: &str, transcription: &Transcription, notes: &NoteTable) -> Result<PathBuf>;
}

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;
const MARGIN_LEFT: f32 = 80.0;
const MARGIN_RIGHT: f32 = 30.0;
const MARGIN_TOP: f32 = 50.0;
const MARGIN_BOTTOM: f32 = 60.0;

/// Writes scatter plots of time (ms) against note as SVG files named
/// `<name>-<unix seconds>.svg`.
#[derive(Debug, Clone)]
pub struct SvgPlotter {
    output_dir: PathBuf,
}

impl SvgPlotter {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        SvgPlotter {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// The path a plot of `name` created at `unix_seconds` is written to.
    pub fn output_path(&self, name: &str, unix_seconds: u64) -> PathBuf {
        self.output_dir
            .join(format!("{}-{}.svg", base_name(name), unix_seconds))
    }

    /// Writes an SVG document plotting each note of `transcription` at its
    /// timestamp and at the frequency of its note in `notes`.
    pub fn write_svg<W: Write>(
        &self,
        out: &mut W,
        name: &str,
        transcription: &Transcription,
        notes: &NoteTable,
    ) -> std::io::Result<()> {
        // (timestamp, note frequency, note name)
        let points: Vec<(f32, f32, &str)> = transcription
            .iter()
            .map(|entry| {
                let frequency = notes
                    .get(&entry.note)
                    .map(|note| note.frequency)
                    .unwrap_or(entry.frequency);
                (entry.timestamp_ms as f32, frequency, entry.note.as_str())
            })
            .collect();

        let max_time = points
            .iter()
            .map(|(time, _, _)| *time)
            .fold(0.0_f32, f32::max)
            .max(1.0);
        // Log frequency axis, padded by a semitone on both sides.
        let semitone = 2.0_f32.powf(1.0 / 12.0);
        let min_freq = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_freq = points.iter().map(|p| p.1).fold(0.0_f32, f32::max);
        let (low, high) = if points.is_empty() {
            (100.0, 1000.0)
        } else {
            (min_freq / semitone, max_freq * semitone)
        };
        let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let x = |time: f32| MARGIN_LEFT + plot_width * time / max_time;
        let y = |freq: f32| {
            MARGIN_TOP + plot_height * (1.0 - (freq / low).log2() / (high / low).log2())
        };

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" font-family="DejaVu Sans, sans-serif">"#,
            WIDTH, HEIGHT, WIDTH, HEIGHT
        )?;
        writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="18">{}</text>"#,
            WIDTH / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape(base_name(name))
        )?;
        writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="black"/>"#,
            MARGIN_LEFT, MARGIN_TOP, plot_width, plot_height
        )?;

        // Time ticks
        for i in 0..=5 {
            let time = max_time * (i as f32) / 5.0;
            writeln!(
                out,
                r#"<text x="{:.1}" y="{}" text-anchor="middle" font-size="11">{:.0}</text>"#,
                x(time),
                HEIGHT - MARGIN_BOTTOM + 18.0,
                time
            )?;
        }
        writeln!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-size="13">time (ms)</text>"#,
            MARGIN_LEFT + plot_width / 2.0,
            HEIGHT - 15.0
        )?;
        writeln!(
            out,
            r#"<text x="15" y="{}" font-size="13">note</text>"#,
            MARGIN_TOP + plot_height / 2.0
        )?;

        // Note ticks, one per distinct note
        let mut labeled: Vec<&str> = Vec::new();
        for (_, freq, note) in points.iter() {
            if labeled.contains(note) {
                continue;
            }
            labeled.push(*note);
            writeln!(
                out,
                r#"<text x="{}" y="{:.1}" text-anchor="end" font-size="11">{}</text>"#,
                MARGIN_LEFT - 6.0,
                y(*freq) + 4.0,
                escape(note)
            )?;
        }

        for (time, freq, _) in points.iter() {
            writeln!(
                out,
                r#"<circle cx="{:.1}" cy="{:.1}" r="3" fill="steelblue"/>"#,
                x(*time),
                y(*freq)
            )?;
        }
        writeln!(out, "</svg>")?;
        Ok(())
    }
}

impl Plotter for SvgPlotter {
    fn plot(
        &self,
        name: &str,
        transcription: &Transcription,
        notes: &NoteTable,
    ) -> Result<PathBuf> {
        let unix_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);
        let path = self.output_path(name, unix_seconds);
        let mut out = BufWriter::new(File::create(&path)?);
        self.write_svg(&mut out, name, transcription, notes)?;
        out.flush()?;
        info!("Wrote {} notes to {}", transcription.len(), path.display());
        Ok(path)
    }
}

fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_name()
        .and_then(|file_name| file_name.to_str())
        .unwrap_or(name)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
