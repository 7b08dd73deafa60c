//! Magnitude conversion for IQ samples
//!
//! RTL-SDR captures are interleaved unsigned 8-bit (I, Q) pairs biased
//! around 127.5. Detection only needs relative amplitudes, so the exact
//! sqrt is replaced by the classic max + 0.4·min approximation, computed
//! once into a 256×256 lookup table.

/// Pre-computed IQ → magnitude lookup table, indexed by `(i << 8) | q`.
pub struct MagnitudeTable {
    table: Box<[u16]>,
}

impl MagnitudeTable {
    pub fn new() -> Self {
        let mut table = vec![0u16; 256 * 256];

        for i in 0..256u32 {
            for q in 0..256u32 {
                let si = (i as i32 - 127).unsigned_abs();
                let sq = (q as i32 - 127).unsigned_abs();
                let (hi, lo) = if si > sq { (si, sq) } else { (sq, si) };

                // max + 0.4·min, in 8.8 fixed point (102/256 ≈ 0.4)
                let mag = (hi << 8) + lo * 102;
                table[(i * 256 + q) as usize] = (mag >> 8) as u16;
            }
        }

        Self {
            table: table.into_boxed_slice(),
        }
    }

    /// Magnitude of a single (I, Q) byte pair.
    #[inline(always)]
    pub fn magnitude(&self, i: u8, q: u8) -> u16 {
        self.table[((i as usize) << 8) | (q as usize)]
    }

    /// Convert an interleaved IQ buffer into a magnitude stream.
    ///
    /// A trailing odd byte (half a sample) is discarded.
    pub fn magnitudes(&self, iq: &[u8]) -> Vec<u16> {
        iq.chunks_exact(2)
            .map(|pair| self.magnitude(pair[0], pair[1]))
            .collect()
    }
}

impl Default for MagnitudeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_maps_near_zero() {
        let table = MagnitudeTable::new();
        assert_eq!(table.magnitude(127, 127), 0);
    }

    #[test]
    fn test_strong_pulse_has_high_magnitude() {
        let table = MagnitudeTable::new();
        assert!(table.magnitude(255, 127) > 100);
        assert!(table.magnitude(127, 255) > 100);
        assert!(table.magnitude(0, 127) > 100);
    }

    #[test]
    fn test_monotone_in_amplitude() {
        let table = MagnitudeTable::new();
        assert!(table.magnitude(227, 127) > table.magnitude(180, 127));
        assert!(table.magnitude(180, 127) > table.magnitude(140, 127));
    }

    #[test]
    fn test_trailing_odd_byte_discarded() {
        let table = MagnitudeTable::new();
        let mags = table.magnitudes(&[227, 127, 127, 127, 99]);
        assert_eq!(mags.len(), 2);
        assert_eq!(mags[1], 0);
    }
}
