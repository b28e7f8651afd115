// Seedable pseudo-random number generator for Chordsmith.
//
// xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seed expansion. Every
// random decision the composer makes (template picks, mode flips, inversions,
// arpeggio ranges, instrument draws) comes from one `SeededRng`, so replaying
// a seed replays a piece note for note.
//
// On top of the raw generator this crate provides the sampling helpers the
// music crate needs: bounded integers, uniform choice, and sampling without
// replacement. The music crate wraps these behind its `RandomSource` port.
//
// Determinism: output must be identical across platforms and compiler
// versions. No floating point, no OS entropy.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ generator. Cloning it forks the stream: both copies produce
/// the same values from that point on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    s: [u64; 4],
}

impl SeededRng {
    /// Create a generator from a `u64` seed.
    ///
    /// Two generators built from the same seed yield identical sequences.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Next raw `u64`.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Uniform integer in `[low, high)`, rejection-sampled to avoid modulo bias.
    ///
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform `i64` in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_i64(&mut self, low: i64, high: i64) -> i64 {
        assert!(low < high, "range_i64: low must be less than high");
        let span = high.abs_diff(low);
        low.wrapping_add(self.range_u64(0, span) as i64)
    }

    /// Fair coin.
    pub fn coin_flip(&mut self) -> bool {
        self.next_u64() >> 63 == 1
    }

    /// Pick one element uniformly. Returns `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        Some(&items[self.range_usize(0, items.len())])
    }

    /// Draw `k` distinct indices from `0..n` in draw order (partial
    /// Fisher-Yates). Returns `None` when `k > n`.
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Option<Vec<usize>> {
        if k > n {
            return None;
        }
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = self.range_usize(i, n);
            pool.swap(i, j);
        }
        pool.truncate(k);
        Some(pool)
    }
}

/// SplitMix64 step, used only to expand a seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn range_usize_within_bounds() {
        let mut rng = SeededRng::new(555);
        for _ in 0..10_000 {
            let v = rng.range_usize(2, 4);
            assert!((2..4).contains(&v), "range_usize out of range: {v}");
        }
    }

    #[test]
    fn range_i64_handles_negative_bounds() {
        let mut rng = SeededRng::new(7);
        let mut seen = [false; 5];
        for _ in 0..10_000 {
            let v = rng.range_i64(-2, 3);
            assert!((-2..3).contains(&v), "range_i64 out of range: {v}");
            seen[(v + 2) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value should be reachable");
    }

    #[test]
    fn coin_flip_is_roughly_fair() {
        let mut rng = SeededRng::new(42);
        let n = 10_000;
        let heads = (0..n).filter(|_| rng.coin_flip()).count();
        let pct = heads as f64 / n as f64;
        assert!((0.45..0.55).contains(&pct), "coin_flip ~50%, got {pct}");
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SeededRng::new(1);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }

    #[test]
    fn sample_indices_distinct_and_bounded() {
        let mut rng = SeededRng::new(99);
        for _ in 0..500 {
            let picks = rng.sample_indices(8, 3).unwrap();
            assert_eq!(picks.len(), 3);
            assert!(picks.iter().all(|&i| i < 8));
            assert_ne!(picks[0], picks[1]);
            assert_ne!(picks[0], picks[2]);
            assert_ne!(picks[1], picks[2]);
        }
        assert!(rng.sample_indices(2, 3).is_none());
        assert_eq!(rng.sample_indices(4, 0), Some(vec![]));
    }

    #[test]
    fn serialization_roundtrip_continues_stream() {
        let mut rng = SeededRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: SeededRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
