//! Seeded random stream owned by each memory instance
//!
//! Memorization and corruption draw from one stream. Keeping it behind a
//! trait lets tests inject scripted sources and keeps runs reproducible
//! without any process-wide RNG state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the random draws needed by [`crate::AssociativeMemory`]
pub trait RandomSource {
    /// Rewind the stream to its initial state
    fn reset(&mut self);

    /// One bipolar component, `+1` or `-1` with equal probability
    fn spin(&mut self) -> i8;

    /// `amount` distinct indices drawn uniformly from `0..length`
    ///
    /// Callers guarantee `amount <= length`.
    fn distinct_indices(&mut self, length: usize, amount: usize) -> Vec<usize>;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn spin(&mut self) -> i8 {
        (**self).spin()
    }

    fn distinct_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        (**self).distinct_indices(length, amount)
    }
}

/// [`RandomSource`] backed by a seeded [`StdRng`]
///
/// # Example
///
/// ```rust
/// use assocmem_core::{RandomSource, SeededSource};
///
/// let mut a = SeededSource::new(1234);
/// let mut b = SeededSource::new(1234);
/// assert_eq!(a.distinct_indices(100, 10), b.distinct_indices(100, 10));
/// ```
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    rng: StdRng,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededSource {
    fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    fn spin(&mut self) -> i8 {
        if self.rng.gen::<bool>() {
            1
        } else {
            -1
        }
    }

    fn distinct_indices(&mut self, length: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, length, amount).into_vec()
    }
}
