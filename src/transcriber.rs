//! Turns a sample sequence into a time-indexed sequence of notes.

use log::{debug, info, trace};
use serde::Serialize;

use crate::error::Result;
use crate::notes::NoteTable;
use crate::pitch_detector::{PitchDetector, MIN_WINDOW_SIZE};
use crate::windowing::Windows;

/// A note detected in the window starting at `timestamp_ms`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscribedNote {
    pub timestamp_ms: u64,
    /// The name of the nearest note.
    pub note: String,
    /// The detected pitch in Hz.
    pub frequency: f32,
}

/// Detected notes in order of strictly increasing timestamps. Windows without
/// a detected pitch have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcription {
    notes: Vec<TranscribedNote>,
}

impl Transcription {
    pub fn new() -> Self {
        Transcription { notes: Vec::new() }
    }

    /// Appends a note. Returns false, leaving the transcription unchanged,
    /// if `timestamp_ms` is not greater than that of the last note.
    pub fn push(&mut self, note: TranscribedNote) -> bool {
        if let Some(last) = self.notes.last() {
            if note.timestamp_ms <= last.timestamp_ms {
                return false;
            }
        }
        self.notes.push(note);
        true
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, TranscribedNote> {
        self.notes.iter()
    }

    pub fn notes(&self) -> &[TranscribedNote] {
        &self.notes
    }

    /// Returns the note detected at `timestamp_ms`, if any.
    pub fn get(&self, timestamp_ms: u64) -> Option<&TranscribedNote> {
        self.notes
            .binary_search_by_key(&timestamp_ms, |note| note.timestamp_ms)
            .ok()
            .map(|index| &self.notes[index])
    }
}

impl<'a> IntoIterator for &'a Transcription {
    type Item = &'a TranscribedNote;
    type IntoIter = core::slice::Iter<'a, TranscribedNote>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Runs a pitch detector over consecutive windows of a signal and maps
/// each detected pitch to the nearest note of a note table.
pub struct Transcriber<'n, D: PitchDetector> {
    detector: D,
    notes: &'n NoteTable,
}

impl<'n, D: PitchDetector> Transcriber<'n, D> {
    pub fn new(detector: D, notes: &'n NoteTable) -> Self {
        Transcriber { detector, notes }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn into_detector(self) -> D {
        self.detector
    }

    /// Transcribes `samples`, using windows of `increment_ms` milliseconds.
    ///
    /// Windows too short for pitch detection, which may occur at the end of
    /// the signal, are skipped.
    pub fn transcribe(
        &mut self,
        samples: &[f32],
        sample_rate: u32,
        increment_ms: u32,
    ) -> Result<Transcription> {
        let windows = Windows::new(samples, sample_rate, increment_ms)?;
        debug!(
            "Transcribing {} samples at {} Hz in {} windows of {} samples",
            samples.len(),
            sample_rate,
            windows.window_count(),
            windows.raw_increment()
        );

        let mut transcription = Transcription::new();
        let mut undetected_count: usize = 0;
        for (window, timestamp_ms) in windows.iter() {
            if window.len() < MIN_WINDOW_SIZE {
                debug!(
                    "Skipping {} sample window at {} ms",
                    window.len(),
                    timestamp_ms
                );
                continue;
            }

            let result = self.detector.detect_pitch(window, sample_rate as f32)?;
            let frequency = match result.frequency() {
                Some(frequency) => frequency,
                None => {
                    trace!("{} ms: no pitch", timestamp_ms);
                    undetected_count += 1;
                    continue;
                }
            };

            match self.notes.nearest(frequency) {
                Some(note) => {
                    trace!("{} ms: {:.2} Hz -> {}", timestamp_ms, frequency, note.name);
                    transcription.push(TranscribedNote {
                        timestamp_ms,
                        note: note.name.clone(),
                        frequency,
                    });
                }
                None => trace!("{} ms: {:.2} Hz, no matching note", timestamp_ms, frequency),
            }
        }

        info!(
            "Transcribed {} notes, {} windows without pitch",
            transcription.len(),
            undetected_count
        );
        Ok(transcription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::mpm::MpmPitchDetector;
    use crate::notes::NOTE_TABLE;
    use crate::pitch_detector::PitchResult;

    fn generate_sine(sample_rate: f32, frequency: f32, sample_count: usize) -> Vec<f32> {
        (0..sample_count)
            .map(|i| (2.0 * core::f32::consts::PI * frequency * (i as f32) / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_transcribe_melody() {
        // A3, silence, E4, C5 at 100 ms each
        let sample_rate = 8000;
        let mut samples = generate_sine(sample_rate as f32, 220.0, 800);
        samples.extend(vec![0.0; 800]);
        samples.extend(generate_sine(sample_rate as f32, 329.63, 800));
        samples.extend(generate_sine(sample_rate as f32, 523.25, 800));

        let mut transcriber = Transcriber::new(MpmPitchDetector::new(), &NOTE_TABLE);
        let transcription = transcriber.transcribe(&samples, sample_rate, 100).unwrap();

        let notes: Vec<(u64, &str)> = transcription
            .iter()
            .map(|note| (note.timestamp_ms, note.note.as_str()))
            .collect();
        assert_eq!(notes, vec![(0, "A3"), (200, "E4"), (300, "C5")]);
        assert!(transcription.get(100).is_none());
        assert!((transcription.get(0).unwrap().frequency - 220.0).abs() < 2.2);
    }

    #[test]
    fn test_silence() {
        let samples = vec![0.0; 8000];
        let mut transcriber = Transcriber::new(MpmPitchDetector::new(), &NOTE_TABLE);
        let transcription = transcriber.transcribe(&samples, 8000, 100).unwrap();
        assert!(transcription.is_empty());
    }

    #[test]
    fn test_short_tail_window_is_skipped() {
        // The last window holds a single sample.
        let samples = generate_sine(8000.0, 440.0, 802);
        let mut transcriber = Transcriber::new(MpmPitchDetector::new(), &NOTE_TABLE);
        let transcription = transcriber.transcribe(&samples, 8000, 100).unwrap();
        assert_eq!(transcription.len(), 1);
        assert_eq!(transcription.notes()[0].note, "A4");
    }

    #[test]
    fn test_invalid_increment() {
        let samples = vec![0.0; 100];
        let mut transcriber = Transcriber::new(MpmPitchDetector::new(), &NOTE_TABLE);
        assert!(matches!(
            transcriber.transcribe(&samples, 8000, 0),
            Err(Error::InvalidIncrement { .. })
        ));
    }

    struct FixedDetector {
        calls: usize,
    }

    impl PitchDetector for FixedDetector {
        fn detect_pitch(&mut self, _: &[f32], _: f32) -> Result<PitchResult> {
            self.calls += 1;
            Ok(if self.calls % 2 == 0 {
                PitchResult::Undetected
            } else {
                PitchResult::Detected(261.0)
            })
        }
    }

    #[test]
    fn test_custom_detector_and_note_table() {
        let table =
            NoteTable::from_json(r#"{ "low": 100.0, "middle": 250.0 }"#.as_bytes()).unwrap();
        let samples = vec![0.0; 1000];
        let mut transcriber = Transcriber::new(FixedDetector { calls: 0 }, &table);
        let transcription = transcriber.transcribe(&samples, 1000, 100).unwrap();
        let timestamps: Vec<u64> = transcription.iter().map(|note| note.timestamp_ms).collect();
        assert_eq!(timestamps, vec![0, 200, 400, 600, 800]);
        assert!(transcription.iter().all(|note| note.note == "middle"));
        assert_eq!(transcriber.into_detector().calls, 10);
    }

    #[test]
    fn test_push_keeps_timestamps_increasing() {
        let mut transcription = Transcription::new();
        let note = |timestamp_ms| TranscribedNote {
            timestamp_ms,
            note: "A4".to_string(),
            frequency: 440.0,
        };
        assert!(transcription.push(note(0)));
        assert!(transcription.push(note(100)));
        assert!(!transcription.push(note(100)));
        assert!(!transcription.push(note(50)));
        assert_eq!(transcription.len(), 2);
    }

    #[test]
    fn test_serialize() {
        let mut transcription = Transcription::new();
        transcription.push(TranscribedNote {
            timestamp_ms: 100,
            note: "A4".to_string(),
            frequency: 440.0,
        });
        let json = serde_json::to_string(&transcription).unwrap();
        assert_eq!(
            json,
            r#"{"notes":[{"timestamp_ms":100,"note":"A4","frequency":440.0}]}"#
        );
    }
}
