use std::iter::Zip;

use super::ChaoticParameters;

/// Iterates the logistic recurrence `x' = r * x * (1 - x)`.
///
/// The seed itself is never yielded, the first item is the first iterate after it.
#[derive(Debug, Clone)]
pub struct LogisticMap {
    r: f64,
    x: f64,
}

impl LogisticMap {
    pub fn new(r: f64, x0: f64) -> Self {
        Self { r, x: x0 }
    }
}

impl Iterator for LogisticMap {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.x = self.r * self.x * (1.0 - self.x);
        Some(self.x)
    }
}

/// Maps a real value to a byte via `floor(x * 256)`.
///
/// Values outside of `[0, 1)` wrap around modulo 256 instead of being clamped.
#[inline]
pub fn quantize(x: f64) -> u8 {
    (x * 256.0).floor() as i64 as u8
}

/// Endless keystream, the XOR of the two quantized logistic maps.
#[derive(Debug, Clone)]
pub struct Keystream {
    maps: Zip<LogisticMap, LogisticMap>,
}

impl Keystream {
    pub fn new(params: &ChaoticParameters) -> Self {
        let (r1, x01) = params.first_map();
        let (r2, x02) = params.second_map();

        Self {
            maps: LogisticMap::new(r1, x01).zip(LogisticMap::new(r2, x02)),
        }
    }
}

impl Iterator for Keystream {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.maps.next().map(|(a, b)| quantize(a) ^ quantize(b))
    }
}

/// Generates exactly `length` keystream bytes for the given parameters.
pub fn generate(length: usize, params: &ChaoticParameters) -> Vec<u8> {
    Keystream::new(params).take(length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logistic_map_should_skip_the_seed() {
        let mut map = LogisticMap::new(3.9, 0.5);
        assert_eq!(map.next(), Some(3.9 * 0.5 * 0.5));
        assert_eq!(map.next(), Some(3.9 * 0.975 * (1.0 - 0.975)));
    }

    #[test]
    fn quantize_should_floor_into_a_byte() {
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(0.975), 249);
        assert_eq!(quantize(0.999_999), 255);
        // out of range values wrap instead of clamp
        assert_eq!(quantize(1.0), 0);
        assert_eq!(quantize(-0.5), 128);
    }

    #[test]
    fn first_bytes_should_match_the_hand_computed_ones() {
        // x1 = 3.9 * 0.5 * 0.5 = 0.975 -> 249
        // y1 = 3.95 * 0.7 * 0.3 = 0.8295 -> 212
        let key = generate(1, &ChaoticParameters::default());
        assert_eq!(key, vec![249 ^ 212]);
    }

    #[test]
    fn should_generate_the_requested_length() {
        let params = ChaoticParameters::default();
        assert!(generate(0, &params).is_empty());
        assert_eq!(generate(12, &params).len(), 12);
        assert_eq!(generate(12, &params), generate(12, &params));
    }

    #[test]
    fn shorter_keystreams_should_be_prefixes_of_longer_ones() {
        let params = ChaoticParameters::default();
        let long = generate(64, &params);
        let short = generate(16, &params);
        assert_eq!(&long[..16], &short[..]);
    }

    #[test]
    fn degenerate_seed_should_yield_a_constant_stream() {
        let params = ChaoticParameters::new(3.9, 0.0, 3.95, 0.0);
        assert!(generate(32, &params).iter().all(|b| *b == 0));
    }
}
