use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default value of [`MpmConfig::cutoff_ratio`].
pub const DEFAULT_CUTOFF_RATIO: f32 = 0.97;
/// Default value of [`MpmConfig::small_amplitude_threshold`].
pub const DEFAULT_SMALL_AMPLITUDE_THRESHOLD: f32 = 0.5;
/// Default value of [`MpmConfig::lower_pitch_cutoff`].
pub const DEFAULT_LOWER_PITCH_CUTOFF: f32 = 80.0;

/// Thresholds controlling which NSDF peak is selected as the pitch period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MpmConfig {
    /// The fraction of the highest peak amplitude a refined peak must reach
    /// to be accepted as the pitch period. Peaks are scanned from short to
    /// long lags and the first one above the cutoff wins.
    pub cutoff_ratio: f32,
    /// Peaks whose raw NSDF value does not exceed this threshold are not
    /// considered pitch period candidates.
    pub small_amplitude_threshold: f32,
    /// The lowest pitch in Hz reported as detected. Estimates at or below
    /// this frequency are rejected.
    pub lower_pitch_cutoff: f32,
}

impl Default for MpmConfig {
    fn default() -> Self {
        MpmConfig {
            cutoff_ratio: DEFAULT_CUTOFF_RATIO,
            small_amplitude_threshold: DEFAULT_SMALL_AMPLITUDE_THRESHOLD,
            lower_pitch_cutoff: DEFAULT_LOWER_PITCH_CUTOFF,
        }
    }
}

impl MpmConfig {
    /// Checks that all options are within their valid ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.cutoff_ratio > 0.0 && self.cutoff_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "cutoff ratio must be in (0, 1], got {}",
                self.cutoff_ratio
            )));
        }
        if !(self.small_amplitude_threshold >= 0.0 && self.small_amplitude_threshold < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "small amplitude threshold must be in [0, 1), got {}",
                self.small_amplitude_threshold
            )));
        }
        if !(self.lower_pitch_cutoff.is_finite() && self.lower_pitch_cutoff >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "lower pitch cutoff must be a non-negative frequency, got {}",
                self.lower_pitch_cutoff
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MpmConfig::default();
        assert_eq!(config.cutoff_ratio, 0.97);
        assert_eq!(config.small_amplitude_threshold, 0.5);
        assert_eq!(config.lower_pitch_cutoff, 80.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range() {
        let invalid = [
            MpmConfig { cutoff_ratio: 0.0, ..MpmConfig::default() },
            MpmConfig { cutoff_ratio: 1.5, ..MpmConfig::default() },
            MpmConfig { cutoff_ratio: f32::NAN, ..MpmConfig::default() },
            MpmConfig { small_amplitude_threshold: -0.1, ..MpmConfig::default() },
            MpmConfig { small_amplitude_threshold: 1.0, ..MpmConfig::default() },
            MpmConfig { lower_pitch_cutoff: -1.0, ..MpmConfig::default() },
            MpmConfig { lower_pitch_cutoff: f32::INFINITY, ..MpmConfig::default() },
        ];
        for config in invalid.iter() {
            match config.validate() {
                Err(Error::InvalidConfig(_)) => {}
                other => panic!("expected invalid config for {:?}, got {:?}", config, other),
            }
        }
    }

    #[test]
    fn test_partial_json() {
        let config: MpmConfig = serde_json::from_str(r#"{ "lower_pitch_cutoff": 60.0 }"#).unwrap();
        assert_eq!(config.lower_pitch_cutoff, 60.0);
        assert_eq!(config.cutoff_ratio, DEFAULT_CUTOFF_RATIO);
    }
}
