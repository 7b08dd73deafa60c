//! Mode S preamble detection and PPM frame demodulation
//!
//! Mode S preamble at 2 MSPS (0.5 µs per sample): energy pulses at samples
//! 0, 2, 7 and 9 of a 16-sample window, the other 12 slots quiet.
//!
//! The 112-bit DF17 payload follows the preamble at 1 µs per bit, two
//! samples per bit: pulse in the first half means 1, in the second half 0.

use tracing::trace;

/// Preamble length in samples
pub const PREAMBLE_SAMPLES: usize = 16;
/// Extended squitter length in bits
pub const FRAME_BITS: usize = 112;
/// Samples per PPM bit at 2 MSPS
pub const SAMPLES_PER_BIT: usize = 2;
/// Full message footprint (preamble + payload) in samples
pub const FRAME_SAMPLES: usize = PREAMBLE_SAMPLES + FRAME_BITS * SAMPLES_PER_BIT;

/// Quiet slots of the preamble window (everything but the four pulses)
const QUIET_SLOTS: [usize; 12] = [1, 3, 4, 5, 6, 8, 10, 11, 12, 13, 14, 15];

/// A demodulated 112-bit frame, not yet CRC-checked or parsed
#[derive(Debug, Clone)]
pub struct RawFrame {
    /// Raw bytes in wire order
    pub data: [u8; 14],
    /// Sample index of the preamble start
    pub timestamp: u64,
    /// Mean magnitude of the four preamble pulses
    pub signal: u16,
}

/// Counters for the detection stage
#[derive(Debug, Default)]
pub struct DetectorStats {
    pub samples_processed: u64,
    pub preambles_detected: u64,
    pub frames_demodulated: u64,
    pub ambiguous_bits: u64,
}

/// Scans a magnitude stream for Mode S preambles and demodulates the
/// payload behind each one.
pub struct Detector {
    threshold_ratio: f64,
    /// Mean magnitude of the last scanned stream, used as the noise floor.
    noise_floor: f64,
    pub stats: DetectorStats,
}

impl Detector {
    pub fn new(threshold_ratio: f64) -> Self {
        Self {
            threshold_ratio,
            noise_floor: 0.0,
            stats: DetectorStats::default(),
        }
    }

    /// Noise floor estimate from the last `scan` call.
    pub fn noise_floor(&self) -> f64 {
        self.noise_floor
    }

    /// Scan a whole magnitude stream and return every demodulated frame,
    /// ordered by sample index.
    pub fn scan(&mut self, mag: &[u16]) -> Vec<RawFrame> {
        self.stats.samples_processed += mag.len() as u64;

        if mag.len() < FRAME_SAMPLES {
            return Vec::new();
        }

        // The pulse threshold tracks the capture's own level: a ratio over
        // the stream mean adapts to gain drift without any absolute tuning.
        let sum: u64 = mag.iter().map(|&m| m as u64).sum();
        self.noise_floor = sum as f64 / mag.len() as f64;
        let threshold = self.threshold_ratio * self.noise_floor;

        let mut frames = Vec::new();
        let mut i = 0;

        while i + FRAME_SAMPLES <= mag.len() {
            if !detect_preamble(mag, i, threshold) {
                i += 1;
                continue;
            }

            self.stats.preambles_detected += 1;

            let signal = ((mag[i] as u32 + mag[i + 2] as u32 + mag[i + 7] as u32 + mag[i + 9] as u32)
                / 4) as u16;

            match demodulate(mag, i + PREAMBLE_SAMPLES) {
                Some(data) => {
                    trace!(
                        "frame at sample {}: signal={} hex={}",
                        i,
                        signal,
                        hex::encode(data)
                    );
                    self.stats.frames_demodulated += 1;
                    frames.push(RawFrame {
                        data,
                        timestamp: i as u64,
                        signal,
                    });
                }
                None => {
                    self.stats.ambiguous_bits += 1;
                }
            }

            // Skip past the whole message so the payload's own pulses are
            // not re-detected as preambles.
            i += FRAME_SAMPLES;
        }

        frames
    }
}

/// Check for a preamble at `pos`.
///
/// Every pulse sample must strictly exceed `threshold`, and every quiet
/// slot must stay strictly below the weakest pulse. Ties fail both rules,
/// which rejects DC offsets and flat broadband noise.
fn detect_preamble(mag: &[u16], pos: usize, threshold: f64) -> bool {
    let p0 = mag[pos];
    let p1 = mag[pos + 2];
    let p2 = mag[pos + 7];
    let p3 = mag[pos + 9];

    if (p0 as f64) <= threshold
        || (p1 as f64) <= threshold
        || (p2 as f64) <= threshold
        || (p3 as f64) <= threshold
    {
        return false;
    }

    let weakest = p0.min(p1).min(p2).min(p3);
    QUIET_SLOTS.iter().all(|&slot| mag[pos + slot] < weakest)
}

/// Demodulate 112 PPM bits starting at `start`, MSB-first into wire-order
/// bytes. Returns `None` when any bit period has equal halves (the pulse
/// position is ambiguous and the whole candidate is unusable).
fn demodulate(mag: &[u16], start: usize) -> Option<[u8; 14]> {
    let mut data = [0u8; 14];

    for bit in 0..FRAME_BITS {
        let first = mag[start + bit * SAMPLES_PER_BIT];
        let second = mag[start + bit * SAMPLES_PER_BIT + 1];

        if first == second {
            return None;
        }
        if first > second {
            data[bit / 8] |= 1 << (7 - (bit % 8));
        }
    }

    Some(data)
}
