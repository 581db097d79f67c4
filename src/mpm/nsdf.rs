use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::common::{
    autocorr_fft, autocorr_fft_planned, autocorr_fft_size, supports_full_autocorr_fft,
    F32ArrayExt,
};

/// Working buffers for [`compute_nsdf`], reused across calls.
pub struct NsdfScratch {
    autocorr: Vec<f32>,
    fft_scratch: Vec<f32>,
    /// Plans FFTs for windows too long for the fixed size real FFTs.
    planner: FftPlanner<f32>,
    spectrum: Vec<Complex<f32>>,
}

impl NsdfScratch {
    pub fn new() -> Self {
        NsdfScratch {
            autocorr: Vec::new(),
            fft_scratch: Vec::new(),
            planner: FftPlanner::new(),
            spectrum: Vec::new(),
        }
    }
}

impl Default for NsdfScratch {
    fn default() -> Self {
        NsdfScratch::new()
    }
}

/// Computes the normalized autocorrelation of `window` for lags `0..window.len()`,
/// i.e the autocorrelation divided by its value at lag 0, and writes it to `nsdf`.
///
/// The mean of `window` is removed in place first. A zero energy window gives
/// an all zero result, since infinite and NaN values are replaced by 0.
pub fn compute_nsdf(window: &mut [f32], nsdf: &mut Vec<f32>, scratch: &mut NsdfScratch) {
    let lag_count = window.len();
    nsdf.clear();
    if lag_count == 0 {
        return;
    }

    window.remove_mean();

    let autocorr = &mut scratch.autocorr;
    autocorr.clear();
    if supports_full_autocorr_fft(lag_count) {
        let fft_size = autocorr_fft_size(lag_count, lag_count);
        autocorr.resize(fft_size, 0.0);
        scratch.fft_scratch.clear();
        scratch.fft_scratch.resize(fft_size, 0.0);
        autocorr_fft(window, &mut autocorr[..], &mut scratch.fft_scratch[..], lag_count);
    } else {
        autocorr.resize(lag_count, 0.0);
        autocorr_fft_planned(
            window,
            &mut autocorr[..],
            &mut scratch.planner,
            &mut scratch.spectrum,
        );
    }

    let energy = autocorr[0];
    nsdf.extend(autocorr.iter().take(lag_count).map(|value| {
        let normalized = *value / energy;
        if normalized == f32::INFINITY || normalized.is_nan() {
            0.0
        } else {
            normalized
        }
    }));
}
