// The random-source port.
//
// Every generation function takes `&mut impl RandomSource` instead of
// reaching for ambient randomness, so a caller can seed, replay or script the
// choices. `chordsmith_prng::SeededRng` is the production implementation.
//
// Only `uniform_int` is required; the other operations have default
// implementations built on it. `SeededRng` overrides them with its own
// helpers so the streams match what the PRNG crate documents.

use chordsmith_prng::SeededRng;

pub trait RandomSource {
    /// Uniform integer in `[lo, hi)`. Returns `lo` when the range is empty.
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64;

    fn coin_flip(&mut self) -> bool {
        self.uniform_int(0, 2) == 1
    }

    /// Uniform index into a collection of `len` items; `None` when empty.
    fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.uniform_int(0, len as i64) as usize)
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.index(items.len()).map(|i| &items[i])
    }

    /// `k` distinct elements in draw order; `None` when `k > items.len()`.
    fn sample_without_replacement<T: Clone>(&mut self, items: &[T], k: usize) -> Option<Vec<T>> {
        if k > items.len() {
            return None;
        }
        let mut order: Vec<usize> = (0..items.len()).collect();
        for i in 0..k {
            let j = self.uniform_int(i as i64, items.len() as i64) as usize;
            order.swap(i, j);
        }
        Some(order[..k].iter().map(|&i| items[i].clone()).collect())
    }
}

impl RandomSource for SeededRng {
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        if lo >= hi {
            return lo;
        }
        self.range_i64(lo, hi)
    }

    fn coin_flip(&mut self) -> bool {
        SeededRng::coin_flip(self)
    }

    fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.choose(items)
    }

    fn sample_without_replacement<T: Clone>(&mut self, items: &[T], k: usize) -> Option<Vec<T>> {
        let picks = self.sample_indices(items.len(), k)?;
        Some(picks.into_iter().map(|i| items[i].clone()).collect())
    }
}
