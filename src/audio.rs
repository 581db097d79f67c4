//! Decoding of WAV files into mono sample sequences.

use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::common::F32ArrayExt;
use crate::error::{Error, Result};

/// RMS level below which a decoded clip is reported as near silent.
pub const NEAR_SILENCE_RMS: f32 = 1e-4;

/// Level problems worth warning about after decoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelIssue {
    /// The clip has no samples.
    Empty,
    /// At least one sample is at or beyond full scale.
    Clipped,
    /// The clip is almost silent and no pitch is likely to be detected.
    NearSilent,
}

/// Checks the level of decoded samples. Clipping is reported before near silence.
pub fn level_issue(samples: &[f32]) -> Option<LevelIssue> {
    if samples.is_empty() {
        Some(LevelIssue::Empty)
    } else if samples.peak_level() >= 1.0 {
        Some(LevelIssue::Clipped)
    } else if samples.rms_level() < NEAR_SILENCE_RMS {
        Some(LevelIssue::NearSilent)
    } else {
        None
    }
}

/// A mono audio signal with a known sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    name: String,
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioClip {
    pub fn from_samples(name: &str, samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(0.0));
        }
        Ok(AudioClip {
            name: name.to_string(),
            samples,
            sample_rate,
        })
    }

    /// Decodes a WAV file. The clip is named after the file stem.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let reader = hound::WavReader::open(path)?;
        debug!("Decoding {}", path.display());
        AudioClip::decode(&name, reader)
    }

    /// Decodes WAV data from an arbitrary reader.
    pub fn from_reader<R: Read>(name: &str, reader: R) -> Result<Self> {
        let reader = hound::WavReader::new(reader)?;
        AudioClip::decode(name, reader)
    }

    fn decode<R: Read>(name: &str, reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let channel_count = usize::from(spec.channels);
        if channel_count == 0 {
            return Err(Error::Decode("WAV data has no channels".to_string()));
        }

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => {
                if spec.bits_per_sample != 32 {
                    return Err(Error::Decode(format!(
                        "unsupported float sample size {}",
                        spec.bits_per_sample
                    )));
                }
                reader
                    .into_samples::<f32>()
                    .collect::<core::result::Result<Vec<f32>, hound::Error>>()?
            }
            hound::SampleFormat::Int => {
                if spec.bits_per_sample == 0 || spec.bits_per_sample > 32 {
                    return Err(Error::Decode(format!(
                        "unsupported integer sample size {}",
                        spec.bits_per_sample
                    )));
                }
                let scale = 1.0 / ((1_u64 << (spec.bits_per_sample - 1)) as f32);
                reader
                    .into_samples::<i32>()
                    .map(|sample| sample.map(|value| (value as f32) * scale))
                    .collect::<core::result::Result<Vec<f32>, hound::Error>>()?
            }
        };

        if interleaved.len() % channel_count != 0 {
            warn!(
                "{}: ignoring incomplete trailing frame of {} samples",
                name,
                interleaved.len() % channel_count
            );
        }

        // Downmix to mono by averaging channels.
        let samples: Vec<f32> = interleaved
            .chunks_exact(channel_count)
            .map(|frame| frame.iter().sum::<f32>() / (channel_count as f32))
            .collect();

        debug!(
            "{}: {} frames, {} channels, {} Hz",
            name,
            samples.len(),
            channel_count,
            spec.sample_rate
        );
        match level_issue(&samples) {
            Some(LevelIssue::Empty) => warn!("{}: no audio frames decoded", name),
            Some(LevelIssue::Clipped) => warn!(
                "{}: clipping detected, peak level {:.3}",
                name,
                samples.peak_level()
            ),
            Some(LevelIssue::NearSilent) => warn!(
                "{}: near silent, RMS level {:.2e}",
                name,
                samples.rms_level()
            ),
            None => {}
        }
        AudioClip::from_samples(name, samples, spec.sample_rate)
    }

    /// The base name of the decoded file, without extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_seconds(&self) -> f32 {
        (self.samples.len() as f32) / (self.sample_rate as f32)
    }
}
