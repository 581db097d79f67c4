use serde::Serialize;

use crate::error::{Error, Result};

/// The smallest window a pitch detector accepts.
pub const MIN_WINDOW_SIZE: usize = 3;

/// The outcome of running pitch detection on a single window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PitchResult {
    /// A pitch was detected. The frequency is in Hz and always positive.
    Detected(f32),
    /// No discernable pitch. Not an error: callers should skip the window.
    Undetected,
}

impl PitchResult {
    /// The detected frequency in Hz, if any.
    pub fn frequency(&self) -> Option<f32> {
        match self {
            PitchResult::Detected(frequency) => Some(*frequency),
            PitchResult::Undetected => None,
        }
    }

    /// Indicates if a pitch was detected.
    pub fn is_detected(&self) -> bool {
        self.frequency().is_some()
    }
}

impl From<PitchResult> for Option<f32> {
    fn from(result: PitchResult) -> Self {
        result.frequency()
    }
}

/// Estimates the fundamental frequency of a window of mono samples.
///
/// Implementations may keep scratch buffers between calls, but no pitch
/// information from one call may influence the next.
pub trait PitchDetector {
    /// Performs pitch detection on `window`, sampled at `sample_rate` Hz.
    ///
    /// Fails if the window holds fewer than [`MIN_WINDOW_SIZE`] samples or if
    /// the sample rate is not a positive, finite number.
    fn detect_pitch(&mut self, window: &[f32], sample_rate: f32) -> Result<PitchResult>;
}

impl<D: PitchDetector + ?Sized> PitchDetector for Box<D> {
    fn detect_pitch(&mut self, window: &[f32], sample_rate: f32) -> Result<PitchResult> {
        (**self).detect_pitch(window, sample_rate)
    }
}

pub(crate) fn validate_input(window: &[f32], sample_rate: f32) -> Result<()> {
    if window.len() < MIN_WINDOW_SIZE {
        return Err(Error::WindowTooShort {
            provided: window.len(),
            minimum: MIN_WINDOW_SIZE,
        });
    }
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    Ok(())
}
