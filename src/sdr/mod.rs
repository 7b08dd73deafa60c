//! Signal-level stages: magnitude conversion, preamble detection and
//! PPM demodulation of raw IQ captures.

pub mod demod;
pub mod detect;

pub use demod::MagnitudeTable;
pub use detect::{Detector, DetectorStats, RawFrame};
