//! Decoder configuration

use thiserror::Error;

/// How to handle the 12-bit altitude field when the Q-bit is 0
/// (100-ft Gillham encoding instead of 25-ft increments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AltitudeQ0Policy {
    /// Report no altitude for Q=0 frames.
    #[default]
    Skip,
    /// Decode the Gillham (Gray) code.
    Gillham,
}

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Preamble pulses must exceed this multiple of the stream's mean
    /// magnitude to count as a detection.
    pub preamble_threshold_ratio: f64,

    /// Drop frames whose CRC-24 residue is nonzero. Disabling trades
    /// precision for recall; downstream DF/TC and CPR gates still apply.
    pub enforce_crc: bool,

    /// Altitude handling for Q=0 frames.
    pub altitude_q0_policy: AltitudeQ0Policy,

    /// Maximum sample-index distance between the even and odd CPR frames
    /// of a pair. 20 M samples is ~10 s at 2 MSPS.
    pub cpr_staleness_samples: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            preamble_threshold_ratio: 5.0,
            enforce_crc: true,
            altitude_q0_policy: AltitudeQ0Policy::default(),
            cpr_staleness_samples: 20_000_000,
        }
    }
}

/// Fatal configuration errors, rejected before any decoding starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("preamble threshold ratio must be a positive finite number, got {0}")]
    InvalidThresholdRatio(f64),

    #[error("CPR staleness bound must be positive")]
    InvalidStaleness,
}

impl DecoderConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.preamble_threshold_ratio.is_finite() || self.preamble_threshold_ratio <= 0.0 {
            return Err(ConfigError::InvalidThresholdRatio(
                self.preamble_threshold_ratio,
            ));
        }
        if self.cpr_staleness_samples == 0 {
            return Err(ConfigError::InvalidStaleness);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DecoderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        let mut config = DecoderConfig::default();
        config.preamble_threshold_ratio = 0.0;
        assert!(config.validate().is_err());

        config.preamble_threshold_ratio = -3.0;
        assert!(config.validate().is_err());

        config.preamble_threshold_ratio = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_staleness() {
        let mut config = DecoderConfig::default();
        config.cpr_staleness_samples = 0;
        assert!(config.validate().is_err());
    }
}
