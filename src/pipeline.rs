//! Decoding pipeline
//!
//! Drives the stages in order over one capture:
//! bytes → magnitudes → frames → parsed records → position fixes.
//! Data flows strictly one way; the only state carried across frames is
//! the per-aircraft CPR pairing table, which lives and dies with one run.

use tracing::{debug, info};

use crate::adsb::cpr::CprContext;
use crate::adsb::parser::{parse_airborne_position, ParseReject};
use crate::adsb::types::PositionFix;
use crate::adsb::{crc, Frame};
use crate::config::{ConfigError, DecoderConfig};
use crate::sdr::{Detector, MagnitudeTable};

/// Counters aggregated over a whole run.
///
/// Candidate- and pair-level rejections are normal operating conditions;
/// they are counted here instead of surfacing as errors.
#[derive(Debug, Default)]
pub struct DecodeStats {
    pub samples_processed: u64,
    pub preambles_detected: u64,
    pub frames_demodulated: u64,
    pub ambiguous_bits: u64,
    pub crc_failures: u64,
    pub non_df17: u64,
    pub tc_out_of_range: u64,
    pub nl_mismatches: u64,
    pub stale_pairs: u64,
    pub out_of_range: u64,
    pub aircraft_seen: u64,
    pub fixes_emitted: u64,
}

/// One-shot decoder: owns the configuration and the run counters.
pub struct Decoder {
    config: DecoderConfig,
    pub stats: DecodeStats,
}

impl Decoder {
    /// Create a decoder, rejecting invalid configurations up front.
    pub fn new(config: DecoderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            stats: DecodeStats::default(),
        })
    }

    /// Decode a whole IQ capture into position fixes.
    ///
    /// A trailing odd byte is discarded; an empty capture is a valid run
    /// that produces no fixes.
    pub fn run(&mut self, iq: &[u8]) -> Vec<PositionFix> {
        self.stats = DecodeStats::default();

        let mag = MagnitudeTable::new().magnitudes(iq);

        let mut detector = Detector::new(self.config.preamble_threshold_ratio);
        let raw_frames = detector.scan(&mag);

        let mut cpr = CprContext::new(self.config.cpr_staleness_samples);
        let mut fixes = Vec::new();

        for raw in &raw_frames {
            if self.config.enforce_crc && !crc::crc_ok(&raw.data) {
                self.stats.crc_failures += 1;
                continue;
            }

            let frame = Frame::new(raw.data);
            let record = match parse_airborne_position(
                &frame,
                raw.timestamp,
                self.config.altitude_q0_policy,
            ) {
                Ok(record) => record,
                Err(ParseReject::NotDf17) => {
                    self.stats.non_df17 += 1;
                    continue;
                }
                Err(ParseReject::TypeCodeOutOfRange) => {
                    self.stats.tc_out_of_range += 1;
                    continue;
                }
            };

            if let Some((lat, lon)) = cpr.update(&record) {
                debug!(
                    "fix: icao={:06x} lat={:.5} lon={:.5} alt={:?} (frame {})",
                    record.icao,
                    lat,
                    lon,
                    record.altitude_ft,
                    frame.to_hex()
                );
                fixes.push(PositionFix {
                    icao: record.icao,
                    lat,
                    lon,
                    alt_ft: record.altitude_ft,
                });
            }
        }

        self.stats.samples_processed = detector.stats.samples_processed;
        self.stats.preambles_detected = detector.stats.preambles_detected;
        self.stats.frames_demodulated = detector.stats.frames_demodulated;
        self.stats.ambiguous_bits = detector.stats.ambiguous_bits;
        self.stats.nl_mismatches = cpr.stats.nl_mismatches;
        self.stats.stale_pairs = cpr.stats.stale_pairs;
        self.stats.out_of_range = cpr.stats.out_of_range;
        self.stats.aircraft_seen = cpr.aircraft_count() as u64;
        self.stats.fixes_emitted = fixes.len() as u64;

        info!(
            "decoded {} fixes from {} aircraft ({} preambles, {} frames, noise floor {:.2})",
            fixes.len(),
            cpr.aircraft_count(),
            detector.stats.preambles_detected,
            detector.stats.frames_demodulated,
            detector.noise_floor()
        );

        fixes
    }
}

/// Decode a capture with the given configuration.
pub fn decode(iq: &[u8], config: &DecoderConfig) -> Result<Vec<PositionFix>, ConfigError> {
    let mut decoder = Decoder::new(config.clone())?;
    Ok(decoder.run(iq))
}
