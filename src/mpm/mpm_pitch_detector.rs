use crate::error::Result;
use crate::mpm::config::MpmConfig;
use crate::mpm::key_maximum::KeyMaximum;
use crate::mpm::nsdf::{compute_nsdf, NsdfScratch};
use crate::mpm::peak_picking::pick_peaks;
use crate::pitch_detector::{validate_input, PitchDetector, PitchResult};

/// MPM pitch detector operating on one window at a time.
///
/// Owns the scratch buffers used during detection. These are cleared, not
/// reallocated, on every call, so a detector instance should be reused for
/// consecutive windows. Use one instance per thread.
pub struct MpmPitchDetector {
    config: MpmConfig,
    /// Mean-removed copy of the most recent window.
    window: Vec<f32>,
    nsdf: Vec<f32>,
    nsdf_scratch: NsdfScratch,
    peaks: Vec<usize>,
    /// Refined maxima of the peaks whose raw value exceeds the small amplitude threshold.
    key_maxima: Vec<KeyMaximum>,
    selected_key_max_index: Option<usize>,
}

impl Default for MpmPitchDetector {
    fn default() -> Self {
        MpmPitchDetector::new()
    }
}

impl MpmPitchDetector {
    /// Creates a detector with the default configuration.
    pub fn new() -> Self {
        MpmPitchDetector {
            config: MpmConfig::default(),
            window: Vec::new(),
            nsdf: Vec::new(),
            nsdf_scratch: NsdfScratch::new(),
            peaks: Vec::new(),
            key_maxima: Vec::new(),
            selected_key_max_index: None,
        }
    }

    /// Creates a detector with a custom configuration.
    pub fn from_config(config: MpmConfig) -> Result<Self> {
        config.validate()?;
        let mut detector = MpmPitchDetector::new();
        detector.config = config;
        Ok(detector)
    }

    pub fn config(&self) -> &MpmConfig {
        &self.config
    }

    /// The NSDF computed by the most recent call to `detect_pitch`.
    pub fn nsdf(&self) -> &[f32] {
        &self.nsdf
    }

    /// The lag indices of the lobe maxima found by the most recent call to `detect_pitch`.
    pub fn peaks(&self) -> &[usize] {
        &self.peaks
    }

    /// The refined maxima considered as pitch period candidates by the most
    /// recent call to `detect_pitch`, in increasing lag order.
    pub fn key_maxima(&self) -> &[KeyMaximum] {
        &self.key_maxima
    }

    /// The key maximum selected as the pitch period, if any. Set even if the
    /// resulting frequency was rejected by the lower pitch cutoff.
    pub fn selected_key_maximum(&self) -> Option<&KeyMaximum> {
        self.selected_key_max_index.map(|index| &self.key_maxima[index])
    }

    fn reset(&mut self) {
        self.window.clear();
        self.nsdf.clear();
        self.peaks.clear();
        self.key_maxima.clear();
        self.selected_key_max_index = None;
    }

    /// Gathers key maxima from the current peaks and selects the pitch period.
    fn select_pitch(&mut self, sample_rate: f32) -> PitchResult {
        let nsdf = &self.nsdf[..];
        let mut highest_amplitude = f32::NEG_INFINITY;
        for &lag_index in self.peaks.iter() {
            let value = nsdf[lag_index];
            highest_amplitude = highest_amplitude.max(value);

            if value > self.config.small_amplitude_threshold {
                let key_max = KeyMaximum::from_nsdf(nsdf, lag_index);
                highest_amplitude = highest_amplitude.max(key_max.value);
                self.key_maxima.push(key_max);
            }
        }

        if self.key_maxima.is_empty() {
            return PitchResult::Undetected;
        }

        // Pick the shortest period that is nearly as strong as the strongest one.
        // Falls back to the first key maximum.
        let actual_cutoff = self.config.cutoff_ratio * highest_amplitude;
        let selected_index = self
            .key_maxima
            .iter()
            .position(|key_max| key_max.value >= actual_cutoff)
            .unwrap_or(0);
        self.selected_key_max_index = Some(selected_index);

        let pitch_estimate = sample_rate / self.key_maxima[selected_index].lag;
        if pitch_estimate > self.config.lower_pitch_cutoff {
            PitchResult::Detected(pitch_estimate)
        } else {
            PitchResult::Undetected
        }
    }
}

impl PitchDetector for MpmPitchDetector {
    fn detect_pitch(&mut self, window: &[f32], sample_rate: f32) -> Result<PitchResult> {
        validate_input(window, sample_rate)?;

        self.reset();
        self.window.extend_from_slice(window);
        compute_nsdf(&mut self.window, &mut self.nsdf, &mut self.nsdf_scratch);
        pick_peaks(&self.nsdf, &mut self.peaks);
        Ok(self.select_pitch(sample_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// An NSDF with a unit peak at lag 0 followed by negative values, except
    /// for symmetric three sample lobes `(center, value)`.
    fn nsdf_with_lobes(length: usize, lobes: &[(usize, f32)]) -> Vec<f32> {
        let mut nsdf = vec![-0.1; length];
        nsdf[0] = 1.0;
        for &(center, value) in lobes.iter() {
            nsdf[center - 1] = value - 0.05;
            nsdf[center] = value;
            nsdf[center + 1] = value - 0.05;
        }
        nsdf
    }

    fn select_from_nsdf(
        detector: &mut MpmPitchDetector,
        nsdf: &[f32],
        sample_rate: f32,
    ) -> PitchResult {
        detector.reset();
        detector.nsdf.extend_from_slice(nsdf);
        pick_peaks(&detector.nsdf, &mut detector.peaks);
        detector.select_pitch(sample_rate)
    }

    fn generate_sine(sample_rate: f32, frequency: f32, sample_count: usize) -> Vec<f32> {
        let mut window: Vec<f32> = vec![0.0; sample_count];
        for i in 0..sample_count {
            let sine_value =
                (2.0 * core::f32::consts::PI * frequency * (i as f32) / sample_rate).sin();
            window[i] = sine_value;
        }
        return window;
    }

    #[test]
    fn test_200_hz_at_8000() {
        let sample_rate = 8000.0;
        let window = generate_sine(sample_rate, 200.0, 200);
        let mut detector = MpmPitchDetector::new();
        let result = detector.detect_pitch(&window, sample_rate).unwrap();
        let frequency = result.frequency().unwrap();
        assert!((frequency - 200.0).abs() <= 2.0, "got {} Hz", frequency);
    }

    #[test]
    fn test_sine_detection() {
        let sample_rate: f32 = 44100.0;
        let window_size = 4410;
        let mut detector = MpmPitchDetector::new();
        for frequency in [100.0_f32, 110.0, 220.0, 261.63, 440.0, 880.0, 1760.0, 3000.0].iter() {
            let window = generate_sine(sample_rate, *frequency, window_size);
            let result = detector.detect_pitch(&window, sample_rate).unwrap();
            let detected = result.frequency().unwrap();
            assert!(
                (detected - frequency).abs() / frequency <= 0.01,
                "expected {} Hz, got {} Hz",
                frequency,
                detected
            );
        }
    }

    #[test]
    fn test_harmonic_tone() {
        // A strong second harmonic must not be mistaken for the fundamental.
        let sample_rate: f32 = 44100.0;
        let fundamental = generate_sine(sample_rate, 220.0, 4410);
        let harmonic = generate_sine(sample_rate, 440.0, 4410);
        let window: Vec<f32> = fundamental
            .iter()
            .zip(harmonic.iter())
            .map(|(a, b)| a + 0.8 * b)
            .collect();
        let mut detector = MpmPitchDetector::new();
        let detected = detector
            .detect_pitch(&window, sample_rate)
            .unwrap()
            .frequency()
            .unwrap();
        assert!((detected - 220.0).abs() <= 2.2);
    }

    #[test]
    fn test_low_frequency_is_rejected() {
        let sample_rate = 8000.0;
        let window = generate_sine(sample_rate, 40.0, 1600);
        let mut detector = MpmPitchDetector::new();
        let result = detector.detect_pitch(&window, sample_rate).unwrap();
        assert_eq!(result, PitchResult::Undetected);

        // The period was found, it is only the frequency that is too low.
        let selected = detector.selected_key_maximum().unwrap();
        assert!((sample_rate / selected.lag - 40.0).abs() < 1.0);
    }

    #[test]
    fn test_lower_pitch_cutoff_is_configurable() {
        let sample_rate = 8000.0;
        let window = generate_sine(sample_rate, 40.0, 1600);
        let config = MpmConfig {
            lower_pitch_cutoff: 20.0,
            ..MpmConfig::default()
        };
        let mut detector = MpmPitchDetector::from_config(config).unwrap();
        let detected = detector
            .detect_pitch(&window, sample_rate)
            .unwrap()
            .frequency()
            .unwrap();
        assert!((detected - 40.0).abs() < 1.0);
    }

    #[test]
    fn test_silence() {
        let mut detector = MpmPitchDetector::new();
        let result = detector.detect_pitch(&[0.0; 1024], 44100.0).unwrap();
        assert_eq!(result, PitchResult::Undetected);
        assert!(detector.nsdf().iter().all(|value| *value == 0.0));
        assert!(detector.peaks().is_empty());
        assert!(detector.key_maxima().is_empty());
    }

    #[test]
    fn test_constant_window() {
        let mut detector = MpmPitchDetector::new();
        let result = detector.detect_pitch(&[0.25; 200], 8000.0).unwrap();
        assert_eq!(result, PitchResult::Undetected);
    }

    #[test]
    fn test_too_short_window() {
        let mut detector = MpmPitchDetector::new();
        assert_eq!(
            detector.detect_pitch(&[0.1, 0.2], 44100.0),
            Err(Error::WindowTooShort {
                provided: 2,
                minimum: 3
            })
        );
        assert_eq!(
            detector.detect_pitch(&[], 44100.0),
            Err(Error::WindowTooShort {
                provided: 0,
                minimum: 3
            })
        );
    }

    #[test]
    fn test_invalid_sample_rate() {
        let mut detector = MpmPitchDetector::new();
        assert_eq!(
            detector.detect_pitch(&[0.1, 0.2, 0.3], 0.0),
            Err(Error::InvalidSampleRate(0.0))
        );
    }

    #[test]
    fn test_invalid_config() {
        let config = MpmConfig {
            cutoff_ratio: 2.0,
            ..MpmConfig::default()
        };
        assert!(MpmPitchDetector::from_config(config).is_err());
    }

    #[test]
    fn test_determinism() {
        let sample_rate = 44100.0;
        let window = generate_sine(sample_rate, 329.63, 2048);
        let first = MpmPitchDetector::new().detect_pitch(&window, sample_rate).unwrap();
        let second = MpmPitchDetector::new().detect_pitch(&window, sample_rate).unwrap();
        let a = first.frequency().unwrap();
        let b = second.frequency().unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_no_state_leaks_between_windows() {
        let sample_rate = 44100.0;
        let tone = generate_sine(sample_rate, 440.0, 4410);
        let mut detector = MpmPitchDetector::new();
        assert!(detector.detect_pitch(&tone, sample_rate).unwrap().is_detected());
        assert!(!detector.key_maxima().is_empty());

        let result = detector.detect_pitch(&[0.0; 500], sample_rate).unwrap();
        assert_eq!(result, PitchResult::Undetected);
        assert_eq!(detector.nsdf().len(), 500);
        assert!(detector.key_maxima().is_empty());
        assert!(detector.selected_key_maximum().is_none());

        // Same result as a fresh detector
        let reused = detector.detect_pitch(&tone, sample_rate).unwrap();
        let fresh = MpmPitchDetector::new().detect_pitch(&tone, sample_rate).unwrap();
        assert_eq!(reused, fresh);
    }

    #[test]
    fn test_caller_window_is_not_modified() {
        let window: Vec<f32> = generate_sine(8000.0, 200.0, 200)
            .iter()
            .map(|sample| sample + 1.0)
            .collect();
        let before = window.clone();
        let mut detector = MpmPitchDetector::new();
        detector.detect_pitch(&window, 8000.0).unwrap();
        assert_eq!(window, before);
    }

    #[test]
    fn test_nsdf_properties() {
        let sample_rate = 8000.0;
        let window = generate_sine(sample_rate, 250.0, 400);
        let mut detector = MpmPitchDetector::new();
        detector.detect_pitch(&window, sample_rate).unwrap();
        assert_eq!(detector.nsdf().len(), window.len());
        assert_eq!(detector.nsdf()[0], 1.0);
        for pair in detector.peaks().windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for key_max in detector.key_maxima() {
            assert!(key_max.value_at_lag_index > 0.5);
        }
    }

    #[test]
    fn test_selects_shortest_lag_above_cutoff() {
        // The later lobe is higher, but the earlier one is within 97% of it.
        let mut detector = MpmPitchDetector::new();
        let nsdf = nsdf_with_lobes(100, &[(20, 0.9), (40, 0.92)]);
        let result = select_from_nsdf(&mut detector, &nsdf, 8000.0);
        assert_eq!(detector.peaks(), &[20, 40]);
        assert_eq!(result, PitchResult::Detected(400.0));
        assert_eq!(detector.selected_key_maximum().unwrap().lag_index, 20);
    }

    #[test]
    fn test_skips_lobes_below_cutoff() {
        let mut detector = MpmPitchDetector::new();
        let nsdf = nsdf_with_lobes(100, &[(20, 0.6), (40, 0.9)]);
        let result = select_from_nsdf(&mut detector, &nsdf, 8000.0);
        assert_eq!(detector.key_maxima().len(), 2);
        assert_eq!(result, PitchResult::Detected(200.0));
        assert_eq!(detector.selected_key_maximum().unwrap().lag_index, 40);
    }

    #[test]
    fn test_small_lobes_are_not_key_maxima() {
        let mut detector = MpmPitchDetector::new();
        let nsdf = nsdf_with_lobes(100, &[(20, 0.5), (40, 0.8)]);
        let result = select_from_nsdf(&mut detector, &nsdf, 8000.0);
        assert_eq!(detector.peaks(), &[20, 40]);
        assert_eq!(detector.key_maxima().len(), 1);
        assert_eq!(detector.key_maxima()[0].lag_index, 40);
        assert_eq!(result, PitchResult::Detected(200.0));

        let nsdf = nsdf_with_lobes(100, &[(20, 0.3), (40, 0.45)]);
        let result = select_from_nsdf(&mut detector, &nsdf, 8000.0);
        assert_eq!(detector.peaks(), &[20, 40]);
        assert!(detector.key_maxima().is_empty());
        assert!(detector.selected_key_maximum().is_none());
        assert_eq!(result, PitchResult::Undetected);
    }

    #[test]
    fn test_lower_pitch_cutoff_boundary() {
        let mut detector = MpmPitchDetector::new();

        // 8000 / 100 is exactly 80 Hz, which is rejected.
        let nsdf = nsdf_with_lobes(300, &[(100, 0.9)]);
        let result = select_from_nsdf(&mut detector, &nsdf, 8000.0);
        assert_eq!(detector.selected_key_maximum().unwrap().lag, 100.0);
        assert_eq!(result, PitchResult::Undetected);

        let nsdf = nsdf_with_lobes(300, &[(99, 0.9)]);
        let result = select_from_nsdf(&mut detector, &nsdf, 8000.0);
        assert_eq!(result, PitchResult::Detected(8000.0 / 99.0));
    }
}
