//! `[f32]` extensions.

use micromath::F32Ext;

/// `[f32]` extensions.
pub trait F32ArrayExt {
    /// Returns the maximum absolute value.
    fn peak_level(&self) -> f32;
    /// Returns the maximum absolute value in dB relative to 1,
    /// i.e 0 dB corresponds to a level of 1.
    fn peak_level_db(&self) -> f32;
    /// Returns the [root mean square](https://en.wikipedia.org/wiki/Root_mean_square)
    /// level.
    fn rms_level(&self) -> f32;
    /// Returns the arithmetic mean, or 0 for an empty slice.
    fn mean(&self) -> f32;
    /// Subtracts the arithmetic mean from every element. A slice whose
    /// elements are all equal becomes exactly zero.
    fn remove_mean(&mut self);
}

impl F32ArrayExt for [f32] {
    fn peak_level(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        };

        let mut max: f32 = 0.0;
        for sample in self.iter() {
            let value = sample.abs();
            if value > max {
                max = value
            }
        }
        max
    }

    fn peak_level_db(&self) -> f32 {
        20. * F32Ext::log10(self.peak_level())
    }

    fn rms_level(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        };
        let mut rms: f32 = 0.;
        for sample in self.iter() {
            rms += sample * sample
        }
        F32Ext::sqrt(rms / (self.len() as f32))
    }

    fn mean(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f32>() / (self.len() as f32)
    }

    fn remove_mean(&mut self) {
        let first = match self.first() {
            Some(first) => *first,
            None => return,
        };
        // Rounding in the mean would otherwise leave a tiny nonzero residual.
        if self.iter().all(|sample| *sample == first) {
            for sample in self.iter_mut() {
                *sample = 0.0;
            }
            return;
        }

        let mean = self.mean();
        for sample in self.iter_mut() {
            *sample -= mean;
        }
    }
}
