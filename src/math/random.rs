//! Pluggable uniform random sources for shuffling and annealing
//!
//! The optimizer never touches a global generator. Callers pass a
//! [`RandomSource`] explicitly so a seeded run can be replayed exactly.

use crate::io::configuration::{LCG_INCREMENT, LCG_MULTIPLIER};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// 2^32 as a float, the LCG modulus
const LCG_MODULUS: f64 = 4_294_967_296.0;

/// Uniform source of values in `[0, 1)`
pub trait RandomSource {
    /// Next uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`, computed as `floor(next_unit() * len)`
    ///
    /// Returns 0 for an empty range.
    fn next_index(&mut self, len: usize) -> usize {
        let scaled = (self.next_unit() * len as f64) as usize;
        scaled.min(len.saturating_sub(1))
    }
}

/// Seeded linear congruential generator
///
/// `state = (state * 1664525 + 1013904223) mod 2^32`, yielding `state / 2^32`.
/// Two generators built from the same seed produce identical sequences.
#[derive(Debug, Clone)]
pub struct LcgRandom {
    state: u32,
}

impl LcgRandom {
    /// Create a generator starting from `seed`
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state
    pub const fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for LcgRandom {
    fn next_unit(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        f64::from(self.state) / LCG_MODULUS
    }
}

/// Unseeded source backed by an OS-seeded [`StdRng`]
pub struct EntropyRandom {
    rng: StdRng,
}

impl EntropyRandom {
    /// Create a generator seeded from operating system entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for EntropyRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Seeded LCG when a seed is given, OS entropy otherwise
pub fn random_source(seed: Option<u32>) -> Box<dyn RandomSource> {
    match seed {
        Some(seed) => Box::new(LcgRandom::new(seed)),
        None => Box::new(EntropyRandom::new()),
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }

    fn next_index(&mut self, len: usize) -> usize {
        (**self).next_index(len)
    }
}

/// In-place Fisher–Yates shuffle walking from the last element down
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], random: &mut R) {
    for i in (1..items.len()).rev() {
        let j = random.next_index(i + 1);
        items.swap(i, j);
    }
}
