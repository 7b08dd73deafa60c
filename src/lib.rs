//! Offline Mode S / ADS-B position decoder.
//!
//! Consumes a raw IQ capture (interleaved unsigned 8-bit I/Q samples at
//! 2 MSPS, tuned to 1090 MHz) and produces aircraft position fixes:
//! 1. Convert I/Q pairs to magnitude
//! 2. Detect Mode S preambles
//! 3. Demodulate 112-bit DF17 frames (PPM)
//! 4. Verify CRC-24
//! 5. Parse airborne-position payloads
//! 6. Resolve even/odd CPR pairs into global latitude/longitude

pub mod adsb;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod sdr;

pub use adsb::types::{AirbornePosition, Parity, PositionFix};
pub use config::{AltitudeQ0Policy, ConfigError, DecoderConfig};
pub use pipeline::{decode, DecodeStats, Decoder};
