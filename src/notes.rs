//! Named notes and nearest-note lookup.

use std::collections::BTreeMap;
use std::io::Read;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::common::midi_note_to_freq;
use crate::error::{Error, Result};

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

lazy_static! {
    /// Equal tempered notes from C0 to B8, tuned to A4 = 440 Hz.
    pub static ref NOTE_TABLE: NoteTable = NoteTable::equal_tempered();
}

/// A named note and its frequency in Hz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub frequency: f32,
}

/// An immutable set of notes, ordered by increasing frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteTable {
    notes: Vec<Note>,
}

impl NoteTable {
    /// Creates a table from arbitrary notes. Fails if a frequency is not
    /// positive and finite.
    pub fn new(mut notes: Vec<Note>) -> Result<Self> {
        if let Some(note) = notes
            .iter()
            .find(|note| !(note.frequency.is_finite() && note.frequency > 0.0))
        {
            return Err(Error::NoteTable(format!(
                "note {} has invalid frequency {}",
                note.name, note.frequency
            )));
        }
        // Stable, so notes with equal frequencies keep their relative order.
        notes.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
        Ok(NoteTable { notes })
    }

    /// Equal tempered notes from C0 (MIDI note 12) to B8 (MIDI note 119),
    /// named like `C4` and `F#2`.
    pub fn equal_tempered() -> Self {
        let notes = (12..120)
            .map(|note_number: u32| {
                let octave = note_number / 12 - 1;
                let name = NOTE_NAMES[(note_number % 12) as usize];
                Note {
                    name: format!("{}{}", name, octave),
                    frequency: midi_note_to_freq(note_number as f32),
                }
            })
            .collect();
        NoteTable { notes }
    }

    /// Loads a table from a JSON object mapping note names to frequencies,
    /// e.g `{ "A4": 440.0, "A#4": 466.16 }`.
    pub fn from_json<R: Read>(reader: R) -> Result<Self> {
        let map: BTreeMap<String, f32> = serde_json::from_reader(reader)?;
        if map.is_empty() {
            return Err(Error::NoteTable("the note table is empty".to_string()));
        }
        NoteTable::new(
            map.into_iter()
                .map(|(name, frequency)| Note { name, frequency })
                .collect(),
        )
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Looks up a note by name.
    pub fn get(&self, name: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.name == name)
    }

    /// Returns the note closest to `frequency` in Hz. Ties go to the lower note.
    pub fn nearest(&self, frequency: f32) -> Option<&Note> {
        self.notes.iter().min_by(|a, b| {
            let distance_a = (a.frequency - frequency).abs();
            let distance_b = (b.frequency - frequency).abs();
            distance_a.total_cmp(&distance_b)
        })
    }
}
