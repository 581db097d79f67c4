use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use super::fft::{real_fft, MAX_FFT_SIZE};

/// Computes the length of the FFT needed to compute the autocorrelation
/// for a given window size and lag count to avoid circular convolution effects.
///
/// # Arguments
///
/// * `buffer_size` - The size of the input buffer.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft_size(buffer_size: usize, lag_count: usize) -> usize {
    assert!(lag_count <= buffer_size);
    let min_length = buffer_size + lag_count - 1;
    let mut result: usize = 8; // Start at the smallest supported real FFT size
    while result < min_length {
        result = result << 1;
    }
    result
}

/// Returns true if the autocorrelation of a buffer of the given size can be
/// computed with [`autocorr_fft`] for all lags.
pub fn supports_full_autocorr_fft(buffer_size: usize) -> bool {
    buffer_size > 0 && autocorr_fft_size(buffer_size, buffer_size) <= MAX_FFT_SIZE
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given buffer using FFT.
///
/// # Arguments
///
/// * `buffer` - Input buffer
/// * `result` - A buffer of length `autocorr_fft_size(buffer.len(), lag_count)`.
///   The first `lag_count` elements hold the result.
/// * `scratch_buffer` - A scratch buffer of the same length as `result`.
/// * `lag_count` - The length of the computed autocorrelation.
pub fn autocorr_fft(
    buffer: &[f32],
    result: &mut [f32],
    scratch_buffer: &mut [f32],
    lag_count: usize,
) {
    // Sanity checks
    let fft_size = autocorr_fft_size(buffer.len(), lag_count);
    if result.len() != fft_size {
        panic!(
            "Got autocorr fft buffer of length {}, expected {}.",
            result.len(),
            fft_size
        )
    }
    if scratch_buffer.len() != fft_size {
        panic!("Autocorr fft scratch buffer must have the same length as the result buffer")
    }

    // Build FFT input signal
    result[..buffer.len()].copy_from_slice(buffer);
    for element in result.iter_mut().skip(buffer.len()) {
        *element = 0.0
    }

    // Perform the FFT in place
    let fft = real_fft(result);

    // Compute the power spectral density by point-wise multiplication by the complex conjugate.
    // The spectrum is real and even, which lets a forward FFT stand in for the inverse.
    scratch_buffer[0] = fft[0].re * fft[0].re;
    for (index, fft_value) in fft.iter().enumerate().skip(1) {
        let norm_sq = fft_value.norm_sqr();
        scratch_buffer[index] = norm_sq;
        scratch_buffer[fft_size - index] = norm_sq;
    }
    scratch_buffer[fft.len()] = fft[0].im * fft[0].im;

    // Compute the inverse FFT in place to get the autocorrelation (up to a scaling factor)
    let ifft = real_fft(scratch_buffer);

    // Apply scaling factor
    let scale = 1.0 / (fft_size as f32);
    for (result, ifft) in result.iter_mut().zip(ifft.iter()).take(lag_count) {
        *result = scale * ifft.re;
    }
}

/// Computes the autocorrelation of `buffer` for lags `0..result.len()` using a
/// complex FFT of arbitrary size. Used for buffers too long for [`autocorr_fft`].
/// `spectrum` is a working buffer that is resized as needed.
pub fn autocorr_fft_planned(
    buffer: &[f32],
    result: &mut [f32],
    planner: &mut FftPlanner<f32>,
    spectrum: &mut Vec<Complex<f32>>,
) {
    let lag_count = result.len();
    if lag_count == 0 {
        return;
    }
    assert!(lag_count <= buffer.len());
    let fft_size = (buffer.len() + lag_count - 1).next_power_of_two();

    spectrum.clear();
    spectrum.extend(buffer.iter().map(|sample| Complex::new(*sample, 0.0)));
    spectrum.resize(fft_size, Complex::new(0.0, 0.0));

    planner.plan_fft_forward(fft_size).process(spectrum);
    for value in spectrum.iter_mut() {
        *value = Complex::new(value.norm_sqr(), 0.0);
    }
    planner.plan_fft_inverse(fft_size).process(spectrum);

    let scale = 1.0 / (fft_size as f32);
    for (result, value) in result.iter_mut().zip(spectrum.iter()) {
        *result = scale * value.re;
    }
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given buffer using time domain convolution.
pub fn autocorr_conv(window: &[f32], result: &mut [f32]) {
    let window_size = window.len();
    if window_size < result.len() {
        panic!("Result vector must not be longer than the window.");
    }

    for (tau, value) in result.iter_mut().enumerate() {
        let mut sum: f32 = 0.0;
        for j in 0..(window_size - tau) {
            sum += window[j] * window[j + tau];
        }
        *value = sum;
    }
}
