//! Splits a sample sequence into consecutive, non-overlapping windows of a fixed duration.

use core::iter::FusedIterator;

use crate::error::{Error, Result};

/// The default window duration in milliseconds.
pub const DEFAULT_INCREMENT_MS: u32 = 100;

/// Non-overlapping windows of `increment_ms` milliseconds covering a sample
/// sequence from start to end, each paired with its start time in milliseconds.
///
/// Every window ends at most at the second to last sample of the sequence,
/// so the final sample never appears in any window.
///
/// # Examples
/// ```
/// use transcribe::windowing::Windows;
///
/// let samples = vec![0.0; 1000];
/// let windows = Windows::new(&samples, 8000, 50).unwrap();
/// assert_eq!(windows.raw_increment(), 400);
///
/// let timestamps: Vec<u64> = windows.iter().map(|(_, timestamp_ms)| timestamp_ms).collect();
/// assert_eq!(timestamps, vec![0, 50, 100]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Windows<'a> {
    samples: &'a [f32],
    raw_increment: usize,
    increment_ms: u32,
}

impl<'a> Windows<'a> {
    pub fn new(samples: &'a [f32], sample_rate: u32, increment_ms: u32) -> Result<Self> {
        let raw_increment = (u64::from(increment_ms) * u64::from(sample_rate) / 1000) as usize;
        if raw_increment == 0 {
            return Err(Error::InvalidIncrement {
                increment_ms,
                sample_rate,
            });
        }
        Ok(Windows {
            samples,
            raw_increment,
            increment_ms,
        })
    }

    /// The number of samples between the starts of consecutive windows.
    pub fn raw_increment(&self) -> usize {
        self.raw_increment
    }

    pub fn increment_ms(&self) -> u32 {
        self.increment_ms
    }

    /// The total number of windows.
    pub fn window_count(&self) -> usize {
        (self.samples.len() + self.raw_increment - 1) / self.raw_increment
    }

    /// Returns an iterator starting at the first window. Each call starts a
    /// new, independent traversal.
    pub fn iter(&self) -> WindowIter<'a> {
        WindowIter {
            samples: self.samples,
            raw_increment: self.raw_increment,
            increment_ms: self.increment_ms,
            offset: 0,
            timestamp_ms: 0,
        }
    }
}

impl<'a, 'w> IntoIterator for &'w Windows<'a> {
    type Item = (&'a [f32], u64);
    type IntoIter = WindowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(window, timestamp_ms)` pairs. See [`Windows`].
#[derive(Debug, Clone)]
pub struct WindowIter<'a> {
    samples: &'a [f32],
    raw_increment: usize,
    increment_ms: u32,
    offset: usize,
    timestamp_ms: u64,
}

impl<'a> Iterator for WindowIter<'a> {
    type Item = (&'a [f32], u64);

    fn next(&mut self) -> Option<Self::Item> {
        let sample_count = self.samples.len();
        if self.offset >= sample_count {
            return None;
        }

        let end = (self.offset + self.raw_increment).min(sample_count - 1);
        let item = (&self.samples[self.offset..end], self.timestamp_ms);

        self.offset += self.raw_increment;
        self.timestamp_ms += u64::from(self.increment_ms);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining_samples = self.samples.len().saturating_sub(self.offset);
        let remaining = (remaining_samples + self.raw_increment - 1) / self.raw_increment;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for WindowIter<'a> {}

impl<'a> FusedIterator for WindowIter<'a> {}
