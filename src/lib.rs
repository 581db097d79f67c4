//! Monophonic music transcription based on the MPM (McLeod Pitch Method)
//! [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) detection algorithm.
//! The algorithm is described in the paper [A smarter way to find pitch](http://www.cs.otago.ac.nz/tartini/papers/A_Smarter_Way_to_Find_Pitch.pdf)
//! by Philip McLeod and Geoff Wyvill. It is used for detecting pitch in monophonic,
//! primarily musical, sounds, like a single instrument. It cannot detect multiple
//! pitches at once, like in a musical chord.
//!
//! A recording is split into consecutive windows of fixed duration, pitch detection
//! is performed on each window and detected pitches are mapped to the nearest named
//! note, giving a note-vs-time trace.
//!
//! Features
//! * FFT accelerated autocorrelation computation
//! * Scratch buffers are reused between windows
//! * WAV decoding and SVG plotting of the resulting transcription
//!
//! # Examples
//!
//! ```
//! use transcribe::{MpmPitchDetector, Transcriber, NOTE_TABLE};
//!
//! // Half a second of A4 followed by half a second of silence.
//! let sample_rate = 8000;
//! let mut samples: Vec<f32> = (0..4000)
//!     .map(|i| (2.0 * core::f32::consts::PI * 440.0 * (i as f32) / (sample_rate as f32)).sin())
//!     .collect();
//! samples.extend(vec![0.0; 4000]);
//!
//! let mut transcriber = Transcriber::new(MpmPitchDetector::new(), &NOTE_TABLE);
//! let transcription = transcriber.transcribe(&samples, sample_rate, 100).unwrap();
//!
//! assert_eq!(transcription.len(), 5);
//! for entry in transcription.iter() {
//!     assert_eq!(entry.note, "A4");
//!     assert!(entry.timestamp_ms < 500);
//! }
//! ```

pub mod audio;
pub mod common;
mod error;
pub mod mpm;
pub mod notes;
pub mod plot;
mod pitch_detector;
pub mod transcriber;
pub mod windowing;

pub use audio::{AudioClip, LevelIssue};
pub use error::{Error, Result};
pub use mpm::{MpmConfig, MpmPitchDetector};
pub use notes::{Note, NoteTable, NOTE_TABLE};
pub use pitch_detector::{PitchDetector, PitchResult, MIN_WINDOW_SIZE};
pub use plot::{Plotter, SvgPlotter};
pub use transcriber::{TranscribedNote, Transcriber, Transcription};
pub use windowing::{WindowIter, Windows, DEFAULT_INCREMENT_MS};
