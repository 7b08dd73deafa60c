//! KML writer
//!
//! Google Earth compatible output: one `<LineString>` per aircraft, with
//! fixes in capture order. KML wants `lon,lat,alt` coordinate order and
//! altitude in meters.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use kml::types::{AltitudeMode, Coord, Geometry, LineString, Placemark};
use kml::{Kml, KmlWriter};

use super::format_icao;
use crate::adsb::types::PositionFix;

const FEET_TO_METERS: f64 = 0.3048;

/// Write fixes as a KML document with one track per ICAO address.
pub fn write_kml<W: Write>(mut writer: W, fixes: &[PositionFix]) -> Result<()> {
    // Group per aircraft; BTreeMap keeps the document order stable.
    let mut tracks: BTreeMap<u32, Vec<&PositionFix>> = BTreeMap::new();
    for fix in fixes {
        tracks.entry(fix.icao).or_default().push(fix);
    }

    let mut elements: Vec<Kml<f64>> = Vec::new();
    for (icao, track) in &tracks {
        let coords: Vec<Coord<f64>> = track
            .iter()
            .map(|fix| Coord {
                x: fix.lon,
                y: fix.lat,
                z: Some(fix.alt_ft.map(|a| a as f64 * FEET_TO_METERS).unwrap_or(0.0)),
            })
            .collect();

        let line = LineString {
            coords,
            extrude: false,
            tessellate: false,
            altitude_mode: AltitudeMode::Absolute,
            attrs: HashMap::new(),
        };

        elements.push(Kml::Placemark(Placemark {
            name: Some(format_icao(*icao)),
            description: None,
            geometry: Some(Geometry::LineString(line)),
            style_url: None,
            attrs: HashMap::new(),
            children: vec![],
        }));
    }

    let document = Kml::Document {
        attrs: HashMap::new(),
        elements,
    };

    let mut buf = Vec::new();
    let mut kml_writer = KmlWriter::from_writer(&mut buf);
    kml_writer
        .write(&document)
        .map_err(|e| anyhow::anyhow!("failed to write KML: {e}"))?;

    writer.write_all(&buf)?;
    Ok(())
}
