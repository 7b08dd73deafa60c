//! JSON writer

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use super::format_icao;
use crate::adsb::types::PositionFix;

#[derive(Serialize)]
struct JsonFix {
    lat: f64,
    lon: f64,
    alt: Option<i32>,
    icao: String,
}

/// Write fixes as a JSON array of `{lat, lon, alt, icao}` objects; a
/// missing altitude is emitted as `null`.
pub fn write_json<W: Write>(writer: W, fixes: &[PositionFix]) -> Result<()> {
    let records: Vec<JsonFix> = fixes
        .iter()
        .map(|fix| JsonFix {
            lat: fix.lat,
            lon: fix.lon,
            alt: fix.alt_ft,
            icao: format_icao(fix.icao),
        })
        .collect();

    serde_json::to_writer_pretty(writer, &records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let fixes = vec![
            PositionFix {
                icao: 0x4B1234,
                lat: 52.25,
                lon: 3.92,
                alt_ft: Some(35000),
            },
            PositionFix {
                icao: 0xA0B1C2,
                lat: -12.5,
                lon: 170.25,
                alt_ft: None,
            },
        ];

        let mut buf = Vec::new();
        write_json(&mut buf, &fixes).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value[0]["lat"], 52.25);
        assert_eq!(value[0]["alt"], 35000);
        assert_eq!(value[0]["icao"], "0x4b1234");
        assert!(value[1]["alt"].is_null());
    }

    #[test]
    fn test_empty_fix_list_is_empty_array() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 0);
    }
}
