//! CPR (Compact Position Reporting) position decoding
//!
//! Airborne positions arrive as 17-bit even/odd encodings; a globally
//! unambiguous latitude/longitude needs one frame of each parity from the
//! same aircraft, close together in time. Timestamps here are sample
//! indices into the capture, so "close" is a sample-distance bound.

use std::collections::HashMap;

use super::types::{AirbornePosition, Parity};

/// 2^17, the CPR encoding range
const CPR_MAX: f64 = 131072.0;
/// Even latitude zone size: 360 / (4·NZ)
const D_LAT_EVEN: f64 = 360.0 / 60.0;
/// Odd latitude zone size: 360 / (4·NZ − 1)
const D_LAT_ODD: f64 = 360.0 / 59.0;

/// One stored CPR frame of a single parity
#[derive(Debug, Clone, Copy)]
struct PendingFrame {
    lat_cpr: u32,
    lon_cpr: u32,
    /// Sample index of the source frame
    at: u64,
}

/// Pending even/odd frames for a single aircraft
#[derive(Debug, Clone, Copy, Default)]
struct CprState {
    even: Option<PendingFrame>,
    odd: Option<PendingFrame>,
}

/// Counters for pair-level rejections
#[derive(Debug, Default)]
pub struct CprStats {
    pub nl_mismatches: u64,
    pub stale_pairs: u64,
    pub out_of_range: u64,
}

/// Per-aircraft CPR pairing state for one decoding run
pub struct CprContext {
    states: HashMap<u32, CprState>,
    staleness_samples: u64,
    pub stats: CprStats,
}

impl CprContext {
    pub fn new(staleness_samples: u64) -> Self {
        Self {
            states: HashMap::new(),
            staleness_samples,
            stats: CprStats::default(),
        }
    }

    /// Number of distinct aircraft seen so far.
    pub fn aircraft_count(&self) -> usize {
        self.states.len()
    }

    /// Store a parsed record and attempt a global decode.
    ///
    /// The record replaces any pending frame of the same parity for its
    /// aircraft. Failed decode attempts leave the pending state untouched,
    /// so a later frame can still pair against it.
    pub fn update(&mut self, record: &AirbornePosition) -> Option<(f64, f64)> {
        let state = self.states.entry(record.icao).or_default();

        let pending = PendingFrame {
            lat_cpr: record.cpr_lat,
            lon_cpr: record.cpr_lon,
            at: record.timestamp,
        };
        match record.parity {
            Parity::Even => state.even = Some(pending),
            Parity::Odd => state.odd = Some(pending),
        }

        let even = state.even?;
        let odd = state.odd?;

        if even.at.abs_diff(odd.at) > self.staleness_samples {
            self.stats.stale_pairs += 1;
            return None;
        }

        match decode_global(&even, &odd) {
            DecodeOutcome::Position(lat, lon) => Some((lat, lon)),
            DecodeOutcome::NlMismatch => {
                self.stats.nl_mismatches += 1;
                None
            }
            DecodeOutcome::OutOfRange => {
                self.stats.out_of_range += 1;
                None
            }
        }
    }
}

enum DecodeOutcome {
    Position(f64, f64),
    NlMismatch,
    OutOfRange,
}

/// Global CPR decode from one even and one odd frame.
fn decode_global(even: &PendingFrame, odd: &PendingFrame) -> DecodeOutcome {
    let y_even = even.lat_cpr as f64 / CPR_MAX;
    let y_odd = odd.lat_cpr as f64 / CPR_MAX;
    let x_even = even.lon_cpr as f64 / CPR_MAX;
    let x_odd = odd.lon_cpr as f64 / CPR_MAX;

    // Latitude zone index
    let j = (59.0 * y_even - 60.0 * y_odd + 0.5).floor() as i64;

    let mut lat_even = D_LAT_EVEN * (cpr_mod(j, 60) as f64 + y_even);
    let mut lat_odd = D_LAT_ODD * (cpr_mod(j, 59) as f64 + y_odd);

    if lat_even >= 270.0 {
        lat_even -= 360.0;
    }
    if lat_odd >= 270.0 {
        lat_odd -= 360.0;
    }

    // Both frames must sit in the same longitude-zone band, otherwise the
    // pair straddles a transition and cannot be decoded together.
    let nl = cpr_nl(lat_even);
    if nl != cpr_nl(lat_odd) {
        return DecodeOutcome::NlMismatch;
    }

    // Latitude and longitude come from the more recent frame.
    let use_even = even.at >= odd.at;
    let lat = if use_even { lat_even } else { lat_odd };

    let m = (x_even * (nl - 1) as f64 - x_odd * nl as f64 + 0.5).floor() as i64;
    let n = if use_even {
        nl.max(1)
    } else {
        (nl - 1).max(1)
    };
    let d_lon = 360.0 / n as f64;
    let x = if use_even { x_even } else { x_odd };

    let mut lon = d_lon * (cpr_mod(m, n) as f64 + x);
    if lon > 180.0 {
        lon -= 360.0;
    }

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return DecodeOutcome::OutOfRange;
    }

    DecodeOutcome::Position(lat, lon)
}

/// Floored modulo: result always in [0, b).
fn cpr_mod(a: i64, b: i64) -> i64 {
    let r = a % b;
    if r < 0 {
        r + b
    } else {
        r
    }
}

/// NL (Number of Longitude zones) lookup for a given latitude
fn cpr_nl(lat: f64) -> i64 {
    let lat = lat.abs();

    if lat < 10.47047130 { return 59; }
    if lat < 14.82817437 { return 58; }
    if lat < 18.18626357 { return 57; }
    if lat < 21.02939493 { return 56; }
    if lat < 23.54504487 { return 55; }
    if lat < 25.82924707 { return 54; }
    if lat < 27.93898710 { return 53; }
    if lat < 29.91135686 { return 52; }
    if lat < 31.77209708 { return 51; }
    if lat < 33.53993436 { return 50; }
    if lat < 35.22899598 { return 49; }
    if lat < 36.85025108 { return 48; }
    if lat < 38.41241892 { return 47; }
    if lat < 39.92256684 { return 46; }
    if lat < 41.38651832 { return 45; }
    if lat < 42.80914012 { return 44; }
    if lat < 44.19454951 { return 43; }
    if lat < 45.54626723 { return 42; }
    if lat < 46.86733252 { return 41; }
    if lat < 48.16039128 { return 40; }
    if lat < 49.42776439 { return 39; }
    if lat < 50.67150166 { return 38; }
    if lat < 51.89342469 { return 37; }
    if lat < 53.09516153 { return 36; }
    if lat < 54.27817472 { return 35; }
    if lat < 55.44378444 { return 34; }
    if lat < 56.59318756 { return 33; }
    if lat < 57.72747354 { return 32; }
    if lat < 58.84763776 { return 31; }
    if lat < 59.95459277 { return 30; }
    if lat < 61.04917774 { return 29; }
    if lat < 62.13216659 { return 28; }
    if lat < 63.20427479 { return 27; }
    if lat < 64.26616523 { return 26; }
    if lat < 65.31845310 { return 25; }
    if lat < 66.36171008 { return 24; }
    if lat < 67.39646774 { return 23; }
    if lat < 68.42322022 { return 22; }
    if lat < 69.44242631 { return 21; }
    if lat < 70.45451075 { return 20; }
    if lat < 71.45986473 { return 19; }
    if lat < 72.45884545 { return 18; }
    if lat < 73.45177442 { return 17; }
    if lat < 74.43893416 { return 16; }
    if lat < 75.42056257 { return 15; }
    if lat < 76.39684391 { return 14; }
    if lat < 77.36789461 { return 13; }
    if lat < 78.33374083 { return 12; }
    if lat < 79.29428225 { return 11; }
    if lat < 80.24923213 { return 10; }
    if lat < 81.19801349 { return 9; }
    if lat < 82.13956981 { return 8; }
    if lat < 83.07199445 { return 7; }
    if lat < 83.99173563 { return 6; }
    if lat < 84.89166191 { return 5; }
    if lat < 85.75541621 { return 4; }
    if lat < 86.53536998 { return 3; }
    if lat < 87.00000000 { return 2; }
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(icao: u32, parity: Parity, lat_cpr: u32, lon_cpr: u32, at: u64) -> AirbornePosition {
        AirbornePosition {
            icao,
            type_code: 11,
            altitude_ft: Some(35000),
            parity,
            cpr_lat: lat_cpr,
            cpr_lon: lon_cpr,
            timestamp: at,
        }
    }

    #[test]
    fn test_cpr_nl_table() {
        assert_eq!(cpr_nl(0.0), 59);
        assert_eq!(cpr_nl(-0.01), 59);
        assert_eq!(cpr_nl(45.0), 42);
        assert_eq!(cpr_nl(-45.0), 42);
        assert_eq!(cpr_nl(86.6), 2);
        assert_eq!(cpr_nl(87.0), 1);
        assert_eq!(cpr_nl(90.0), 1);
    }

    #[test]
    fn test_cpr_mod_is_floored() {
        assert_eq!(cpr_mod(-9, 60), 51);
        assert_eq!(cpr_mod(-1, 37), 36);
        assert_eq!(cpr_mod(8, 60), 8);
        assert_eq!(cpr_mod(0, 59), 0);
    }

    #[test]
    fn test_global_decode_even_then_odd() {
        // Even frame first, odd frame 200k samples later: the odd frame is
        // the recent one, so its zone equation supplies the final values.
        let mut ctx = CprContext::new(20_000_000);

        assert!(ctx
            .update(&record(0x4B1234, Parity::Even, 74158, 50194, 0))
            .is_none());
        let (lat, lon) = ctx
            .update(&record(0x4B1234, Parity::Odd, 93000, 51372, 200_000))
            .unwrap();

        assert!((lat + 50.5858961).abs() < 1e-6);
        assert!((lon + 5.9162862).abs() < 1e-6);
    }

    #[test]
    fn test_global_decode_odd_then_even() {
        // Same raw values with the parities exchanged and the even frame
        // most recent: parity picks the zone constants, so the pair
        // decodes to an entirely different position.
        let mut ctx = CprContext::new(20_000_000);

        assert!(ctx
            .update(&record(0x4B1234, Parity::Odd, 74158, 50194, 0))
            .is_none());
        let (lat, lon) = ctx
            .update(&record(0x4B1234, Parity::Even, 93000, 51372, 200_000))
            .unwrap();

        assert!((lat - 52.25720214843750).abs() < 1e-9);
        assert!((lon - 3.91937255859375).abs() < 1e-9);
    }

    #[test]
    fn test_single_parity_never_resolves() {
        let mut ctx = CprContext::new(20_000_000);
        assert!(ctx
            .update(&record(0xABCDEF, Parity::Even, 93000, 51372, 0))
            .is_none());
        assert!(ctx
            .update(&record(0xABCDEF, Parity::Even, 93100, 51400, 500_000))
            .is_none());
    }

    #[test]
    fn test_pairs_do_not_mix_aircraft() {
        let mut ctx = CprContext::new(20_000_000);
        assert!(ctx
            .update(&record(0x111111, Parity::Even, 74158, 50194, 0))
            .is_none());
        assert!(ctx
            .update(&record(0x222222, Parity::Odd, 93000, 51372, 100))
            .is_none());
    }

    #[test]
    fn test_stale_pair_blocks_but_state_remains() {
        let mut ctx = CprContext::new(20_000_000);
        assert!(ctx
            .update(&record(0x4B1234, Parity::Even, 74158, 50194, 0))
            .is_none());
        // 30 M samples later: beyond the 20 M bound.
        assert!(ctx
            .update(&record(0x4B1234, Parity::Odd, 93000, 51372, 30_000_000))
            .is_none());
        assert_eq!(ctx.stats.stale_pairs, 1);

        // A fresh even frame close to the stored odd one pairs again.
        let resolved = ctx.update(&record(0x4B1234, Parity::Even, 74158, 50194, 30_100_000));
        assert!(resolved.is_some());
    }

    #[test]
    fn test_nl_mismatch_rejected() {
        // Even decodes to ~10.45° (NL 59), odd to ~10.49° (NL 58): the pair
        // straddles the first zone transition and must be refused.
        let mut ctx = CprContext::new(20_000_000);
        assert!(ctx
            .update(&record(0x4B1234, Parity::Even, 97220, 50000, 0))
            .is_none());
        assert!(ctx
            .update(&record(0x4B1234, Parity::Odd, 94266, 60000, 1000))
            .is_none());
        assert_eq!(ctx.stats.nl_mismatches, 1);
    }

    #[test]
    fn test_replacement_keeps_most_recent_pair() {
        let mut ctx = CprContext::new(20_000_000);
        ctx.update(&record(0x4B1234, Parity::Even, 74158, 50194, 0));
        let (lat, _lon) = ctx
            .update(&record(0x4B1234, Parity::Odd, 93000, 51372, 100))
            .unwrap();
        assert!((lat + 50.5858961).abs() < 1e-6);

        // A newer even frame replaces the even slot; recency flips and the
        // even zone equation now supplies the latitude.
        let (lat, _lon) = ctx
            .update(&record(0x4B1234, Parity::Even, 74158, 50194, 200))
            .unwrap();
        assert!((lat + 50.605316162109375).abs() < 1e-6);
    }

    #[test]
    fn test_antimeridian_positive_side() {
        // Aircraft at 45.0°N, 179.9°E: encodings land on the positive side
        // without any 360° wrap artifact.
        let mut ctx = CprContext::new(20_000_000);
        ctx.update(&record(0x111111, Parity::Even, 65536, 129543, 0));
        let (lat, lon) = ctx
            .update(&record(0x111111, Parity::Odd, 49152, 64043, 1000))
            .unwrap();
        assert!((lat - 45.0).abs() < 1e-6);
        assert!((lon - 179.9).abs() < 1e-3);
    }

    #[test]
    fn test_antimeridian_negative_side() {
        // Aircraft at 45.0°N, 179.9°W: decode must come out near -179.9,
        // not +180.1.
        let mut ctx = CprContext::new(20_000_000);
        ctx.update(&record(0x222222, Parity::Even, 65536, 1529, 0));
        let (lat, lon) = ctx
            .update(&record(0x222222, Parity::Odd, 49152, 67029, 1000))
            .unwrap();
        assert!((lat - 45.0).abs() < 1e-6);
        assert!((lon + 179.9).abs() < 1e-3);
        assert!(lon > -180.0 && lon <= 180.0);
    }

    #[test]
    fn test_equator_crossing_consistent() {
        // Just north of the equator; NL is 59 on both sides so the gate
        // must not trip.
        let mut ctx = CprContext::new(20_000_000);
        ctx.update(&record(0x333333, Parity::Even, 1092, 0, 0));
        let resolved = ctx.update(&record(0x333333, Parity::Odd, 1074, 0, 1000));
        let (lat, _lon) = resolved.unwrap();
        assert!((lat - 0.05).abs() < 1e-3);
        assert_eq!(ctx.stats.nl_mismatches, 0);
    }

    #[test]
    fn test_near_pole_single_zone() {
        // 88°N is inside the single polar longitude zone (NL = 1); the
        // resolver still terminates and produces a fix.
        let mut ctx = CprContext::new(20_000_000);
        ctx.update(&record(0x444444, Parity::Odd, 55342, 3641, 0));
        let (lat, lon) = ctx
            .update(&record(0x444444, Parity::Even, 87381, 3641, 1000))
            .unwrap();
        assert!((lat - 88.0).abs() < 1e-3);
        assert!((lon - 10.0).abs() < 1e-2);
    }
}
