//! Mode S / ADS-B message interpretation: CRC, typed frame access,
//! DF17 airborne-position parsing and CPR position resolution.

pub mod altitude;
pub mod cpr;
pub mod crc;
pub mod frame;
pub mod parser;
pub mod types;

pub use cpr::CprContext;
pub use frame::Frame;
pub use parser::parse_airborne_position;
