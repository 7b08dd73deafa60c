//! ADS-B data types

/// CPR format flag of an airborne-position frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

/// A parsed DF17 airborne-position record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirbornePosition {
    /// ICAO 24-bit address
    pub icao: u32,
    /// ADS-B type code (9..=18)
    pub type_code: u8,
    /// Barometric altitude in feet, when decodable
    pub altitude_ft: Option<i32>,
    /// CPR format flag
    pub parity: Parity,
    /// Raw 17-bit CPR latitude
    pub cpr_lat: u32,
    /// Raw 17-bit CPR longitude
    pub cpr_lon: u32,
    /// Sample index of the frame's preamble in the capture
    pub timestamp: u64,
}

/// A resolved aircraft position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionFix {
    /// ICAO 24-bit address
    pub icao: u32,
    /// Latitude in degrees, in (-90, 90]
    pub lat: f64,
    /// Longitude in degrees, in (-180, 180]
    pub lon: f64,
    /// Barometric altitude in feet, when the source frame carried one
    pub alt_ft: Option<i32>,
}
