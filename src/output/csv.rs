//! CSV writer

use std::io::Write;

use anyhow::Result;

use super::format_icao;
use crate::adsb::types::PositionFix;

/// Write fixes as CSV with a `lat,lon,alt,icao` header. A fix without an
/// altitude leaves the `alt` field empty.
pub fn write_csv<W: Write>(writer: W, fixes: &[PositionFix]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["lat", "lon", "alt", "icao"])?;

    for fix in fixes {
        out.write_record([
            fix.lat.to_string(),
            fix.lon.to_string(),
            fix.alt_ft.map(|a| a.to_string()).unwrap_or_default(),
            format_icao(fix.icao),
        ])?;
    }

    out.flush()?;
    Ok(())
}
