/// Collects the lag index of the highest local maximum of every positive
/// lobe of the NSDF into `peaks`, in increasing lag order.
///
/// The positive lobe starting at lag 0 is skipped, as long as it ends
/// within the first third of the NSDF. `peaks` is cleared first.
pub fn pick_peaks(nsdf: &[f32], peaks: &mut Vec<usize>) {
    peaks.clear();

    let length = nsdf.len();
    if length < 3 {
        return;
    }
    let last = length - 1;

    // Skip the lobe around lag 0. pos < (length - 1) / 3 without rounding.
    let mut pos: usize = 0;
    while 3 * pos < last && nsdf[pos] > 0.0 {
        pos += 1;
    }

    // Move to the start of the next positive lobe.
    while pos < last && nsdf[pos] <= 0.0 {
        pos += 1;
    }

    if pos == 0 {
        pos = 1;
    }

    // Lag index 0 means no maximum in the current lobe.
    let mut current_max: usize = 0;
    while pos < last {
        let value = nsdf[pos];
        if value > nsdf[pos - 1] && value >= nsdf[pos + 1] {
            if current_max == 0 || value > nsdf[current_max] {
                current_max = pos;
            }
        }

        pos += 1;
        if pos < last && nsdf[pos] <= 0.0 {
            // End of lobe.
            if current_max > 0 {
                peaks.push(current_max);
                current_max = 0;
            }
            while pos < last && nsdf[pos] <= 0.0 {
                pos += 1;
            }
        }
    }

    if current_max > 0 {
        peaks.push(current_max);
    }
}
