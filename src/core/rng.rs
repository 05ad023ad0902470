//! Deterministic random number generation for card selection.
//!
//! ## Key Features
//!
//! - **Deterministic**: same seed produces the identical selection sequence
//! - **Forkable**: create independent streams for parallel test sessions
//!
//! Selection within a kind's candidate list is uniform-random. Backing the
//! engine with a seeded RNG means a whole feed session can be replayed
//! exactly, which is what makes the scheduling behavior testable.
//!
//! ```
//! use card_feed::core::FeedRng;
//!
//! let mut rng = FeedRng::new(42);
//! let items = ["a", "b", "c"];
//!
//! // Same seed, same picks.
//! let mut replay = FeedRng::new(42);
//! assert_eq!(rng.choose(&items), replay.choose(&items));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG used for uniform-random candidate selection.
///
/// Uses ChaCha8 for speed while keeping high-quality randomness.
#[derive(Clone, Debug)]
pub struct FeedRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl FeedRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork this RNG to create an independent stream.
    ///
    /// Each fork produces a different but deterministic sequence. Used to
    /// give parallel engine instances unrelated selection orders from one
    /// session seed.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = FeedRng::new(42);
        let mut rng2 = FeedRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = FeedRng::new(1);
        let mut rng2 = FeedRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_fork_produces_different_sequence() {
        let mut rng = FeedRng::new(42);
        let mut forked = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| rng.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| forked.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = FeedRng::new(42);
        let mut rng2 = FeedRng::new(42);

        let forked1 = rng1.fork();
        let forked2 = rng2.fork();

        assert_eq!(forked1.seed, forked2.seed);
    }

    #[test]
    fn test_choose() {
        let mut rng = FeedRng::new(42);
        let items = vec![1, 2, 3, 4, 5];

        let chosen = rng.choose(&items);
        assert!(chosen.is_some());
        assert!(items.contains(chosen.unwrap()));

        let empty: Vec<i32> = vec![];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_choose_covers_all_elements() {
        let mut rng = FeedRng::new(7);
        let items = vec![0usize, 1, 2];
        let mut hit = [false; 3];

        for _ in 0..200 {
            hit[*rng.choose(&items).unwrap()] = true;
        }

        assert!(hit.iter().all(|&h| h));
    }
}
