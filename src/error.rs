//! Error types for the transcribe crate.

use std::fmt;

/// Errors that can occur while decoding, windowing or analyzing audio.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The window passed to a pitch detector is too short to analyze.
    WindowTooShort { provided: usize, minimum: usize },
    /// The sample rate is zero, negative or not finite.
    InvalidSampleRate(f32),
    /// The millisecond increment yields windows of zero samples.
    InvalidIncrement { increment_ms: u32, sample_rate: u32 },
    /// A pitch detector option is out of range.
    InvalidConfig(String),
    /// The audio data could not be decoded.
    Decode(String),
    /// The note table could not be loaded.
    NoteTable(String),
    /// I/O error.
    Io(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::WindowTooShort { provided, minimum } => write!(
                f,
                "window too short: {} samples provided, {} required",
                provided, minimum
            ),
            Error::InvalidSampleRate(rate) => {
                write!(f, "invalid sample rate: {} (must be > 0)", rate)
            }
            Error::InvalidIncrement {
                increment_ms,
                sample_rate,
            } => write!(
                f,
                "invalid increment: {} ms at {} Hz yields empty windows",
                increment_ms, sample_rate
            ),
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Decode(msg) => write!(f, "decoding failed: {}", msg),
            Error::NoteTable(msg) => write!(f, "invalid note table: {}", msg),
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<hound::Error> for Error {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => Error::Io(io.to_string()),
            other => Error::Decode(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::NoteTable(err.to_string())
    }
}
