/// Fits a parabola through the NSDF values at `lag_index - 1`, `lag_index` and
/// `lag_index + 1` and returns its vertex as `(lag, value)`. If the three points
/// are collinear, `(lag_index, nsdf[lag_index])` is returned unchanged.
///
/// `lag_index` must be an interior index, i.e `1 <= lag_index <= nsdf.len() - 2`.
pub fn parabolic_interpolation(nsdf: &[f32], lag_index: usize) -> (f32, f32) {
    let left = nsdf[lag_index - 1];
    let center = nsdf[lag_index];
    let right = nsdf[lag_index + 1];

    let bottom = right + left - 2.0 * center;
    if bottom == 0.0 {
        (lag_index as f32, center)
    } else {
        let delta = left - right;
        let lag = (lag_index as f32) + delta / (2.0 * bottom);
        let value = center - delta * delta / (8.0 * bottom);
        (lag, value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
/// A key maximum, i.e an NSDF maximum that may or may not correspond
/// to the pitch period.
pub struct KeyMaximum {
    /// The index into the NSDF array corresponding to this maximum
    pub lag_index: usize,
    /// The NSDF value at `lag_index` for this maximum
    pub value_at_lag_index: f32,
    /// The NSDF value for this maximum, approximated using parabolic interpolation.
    pub value: f32,
    /// The lag, in samples, for this maximum, approximated using parabolic interpolation.
    pub lag: f32,
}

impl KeyMaximum {
    pub(crate) fn from_nsdf(nsdf: &[f32], lag_index: usize) -> Self {
        let (lag, value) = parabolic_interpolation(nsdf, lag_index);
        KeyMaximum {
            lag_index,
            value_at_lag_index: nsdf[lag_index],
            value,
            lag,
        }
    }
}
