use core::convert::TryInto;

use microfft::Complex32;

/// The largest FFT size supported by [`real_fft`].
pub const MAX_FFT_SIZE: usize = 16384;

/// Performs an in-place real FFT on a buffer whose length is a power of two
/// between 8 and [`MAX_FFT_SIZE`]. The returned slice holds the
/// first half of the spectrum, with the real valued Nyquist bin packed into the
/// imaginary part of the DC bin.
pub fn real_fft(buffer: &mut [f32]) -> &mut [Complex32] {
    let fft_size = buffer.len();
    match fft_size {
        8 => &mut microfft::real::rfft_8(buffer.try_into().unwrap())[..],
        16 => &mut microfft::real::rfft_16(buffer.try_into().unwrap())[..],
        32 => &mut microfft::real::rfft_32(buffer.try_into().unwrap())[..],
        64 => &mut microfft::real::rfft_64(buffer.try_into().unwrap())[..],
        128 => &mut microfft::real::rfft_128(buffer.try_into().unwrap())[..],
        256 => &mut microfft::real::rfft_256(buffer.try_into().unwrap())[..],
        512 => &mut microfft::real::rfft_512(buffer.try_into().unwrap())[..],
        1024 => &mut microfft::real::rfft_1024(buffer.try_into().unwrap())[..],
        2048 => &mut microfft::real::rfft_2048(buffer.try_into().unwrap())[..],
        4096 => &mut microfft::real::rfft_4096(buffer.try_into().unwrap())[..],
        8192 => &mut microfft::real::rfft_8192(buffer.try_into().unwrap())[..],
        16384 => &mut microfft::real::rfft_16384(buffer.try_into().unwrap())[..],
        _ => panic!("Unsupported fft size {}", fft_size),
    }
}
