//! An implementation of the MPM [pitch](https://en.wikipedia.org/wiki/Pitch_%28music%29) detection algorithm,
//! described in the paper [A smarter way to find pitch](http://www.cs.otago.ac.nz/tartini/papers/A_Smarter_Way_to_Find_Pitch.pdf)
//! by Philip McLeod and Geoff Wyvill. The algorithm is used for detecting pitch in monophonic, primarily musical, sounds. It
//! cannot be used to detect multiple pitches at once, like in a musical chord.
//!
//! Pitch detection on a window proceeds in four steps:
//! 1. The mean is removed and the normalized autocorrelation (here called the NSDF)
//!    is computed for all lags, using real-only FFT when the window is small enough.
//! 2. Peak picking finds the highest maximum of every positive NSDF lobe,
//!    skipping the lobe around lag 0.
//! 3. Maxima above a small amplitude threshold are refined using parabolic interpolation.
//! 4. The first refined maximum reaching a fraction of the highest amplitude is selected
//!    as the pitch period. This favors the fundamental over sub-octaves with
//!    slightly larger NSDF values.
//!
//! # Examples
//! ```
//! use transcribe::mpm::MpmPitchDetector;
//! use transcribe::PitchDetector;
//!
//! // Create a window containing a pure tone at 200 Hz.
//! let sample_rate = 8000.0;
//! let sine_frequency = 200.0;
//! let window: Vec<f32> = (0..200)
//!     .map(|i| (2.0 * core::f32::consts::PI * sine_frequency * (i as f32) / sample_rate).sin())
//!     .collect();
//!
//! let mut detector = MpmPitchDetector::new();
//! let result = detector.detect_pitch(&window, sample_rate).unwrap();
//! match result.frequency() {
//!     Some(frequency) => assert!((frequency - sine_frequency).abs() <= 2.0),
//!     None => panic!("a pure tone should have a pitch"),
//! }
//! ```

mod config;
mod key_maximum;
mod mpm_pitch_detector;
mod nsdf;
mod peak_picking;

pub use config::{
    MpmConfig, DEFAULT_CUTOFF_RATIO, DEFAULT_LOWER_PITCH_CUTOFF,
    DEFAULT_SMALL_AMPLITUDE_THRESHOLD,
};
pub use key_maximum::{parabolic_interpolation, KeyMaximum};
pub use mpm_pitch_detector::MpmPitchDetector;
pub use nsdf::{compute_nsdf, NsdfScratch};
pub use peak_picking::pick_peaks;
