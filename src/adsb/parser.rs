//! DF17 airborne-position parsing

use super::altitude;
use super::frame::Frame;
use super::types::AirbornePosition;
use crate::config::AltitudeQ0Policy;

/// Why a CRC-clean frame was still not an airborne-position record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseReject {
    /// Downlink format other than 17
    NotDf17,
    /// Type code outside the airborne-position range 9..=18
    TypeCodeOutOfRange,
}

/// Extract an airborne-position record from a frame.
///
/// Only DF17 frames with type codes 9..=18 (airborne position, barometric
/// altitude) qualify; everything else is rejected with a reason so the
/// pipeline can count it. `timestamp` is the sample index of the frame's
/// preamble.
pub fn parse_airborne_position(
    frame: &Frame,
    timestamp: u64,
    q0_policy: AltitudeQ0Policy,
) -> Result<AirbornePosition, ParseReject> {
    if frame.df() != 17 {
        return Err(ParseReject::NotDf17);
    }

    let type_code = frame.type_code();
    if !(9..=18).contains(&type_code) {
        return Err(ParseReject::TypeCodeOutOfRange);
    }

    Ok(AirbornePosition {
        icao: frame.icao(),
        type_code,
        altitude_ft: altitude::decode_ac12(frame.altitude_code(), q0_policy),
        parity: frame.cpr_format(),
        cpr_lat: frame.cpr_lat(),
        cpr_lon: frame.cpr_lon(),
        timestamp,
    })
}
