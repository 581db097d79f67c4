//! Common algorithms and utilities.

mod autocorr;
mod f32_array_ext;
mod fft;
mod midi;

pub use autocorr::{
    autocorr_conv, autocorr_fft, autocorr_fft_planned, autocorr_fft_size,
    supports_full_autocorr_fft,
};
pub use f32_array_ext::F32ArrayExt;
pub use fft::{real_fft, MAX_FFT_SIZE};
pub use midi::{cents_offset, freq_to_midi_note, midi_note_to_freq};
