use micromath::F32Ext;

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number (with a fractional part).
pub fn freq_to_midi_note(freq: f32) -> f32 {
    12.0 * F32Ext::log2(freq) - 36.376316562295926
}

/// Converts a (possibly fractional) MIDI note number to a frequency in Hz,
/// using A4 (note 69) = 440 Hz.
pub fn midi_note_to_freq(note_number: f32) -> f32 {
    let exponent = (f64::from(note_number) - 69.0) / 12.0;
    (440.0 * 2.0_f64.powf(exponent)) as f32
}

/// The signed distance in cents from `reference` to `freq`.
pub fn cents_offset(freq: f32, reference: f32) -> f32 {
    100. * (freq_to_midi_note(freq) - freq_to_midi_note(reference))
}
