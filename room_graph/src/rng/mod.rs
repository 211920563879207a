//! Seeded pseudo-random numbers.
//!
//! Every random decision in room and dungeon generation flows through [`Prng`], a linear
//! congruential generator whose state is derived from a string seed. The same seed always
//! yields the same sequence, across every derived operation.

use uuid::Uuid;

/// Modulus of the LCG step (2^31).
pub const MODULUS: u64 = 0x8000_0000;
const MULTIPLIER: u64 = 1_103_515_245;
const INCREMENT: u64 = 12_345;

/// Deterministic random number generator keyed by a string seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prng {
    state: u64,
}

impl Prng {
    /// Create a generator whose state is derived from `seed`.
    pub fn from_seed(seed: &str) -> Self {
        Self {
            state: hash_seed(seed),
        }
    }

    /// Reset the generator to the start of the sequence for `seed`.
    pub fn reseed(&mut self, seed: &str) {
        self.state = hash_seed(seed);
    }

    /// Advance the state and return it. Always in `[0, MODULUS)`.
    pub fn next_int(&mut self) -> u32 {
        self.state = (MULTIPLIER * self.state + INCREMENT) % MODULUS;
        self.state as u32
    }

    /// A float in `[0, 1]`, computed as `next_int() / (MODULUS - 1)`.
    pub fn next_float(&mut self) -> f64 {
        f64::from(self.next_int()) / (MODULUS - 1) as f64
    }

    /// An integer in `[lo, hi)`.
    ///
    /// This scales by `next_int() / MODULUS` rather than [`Prng::next_float`], so the upper
    /// bound is never reached. When `hi <= lo` the range degenerates and `lo` comes back for
    /// `hi == lo`.
    pub fn next_range(&mut self, lo: i32, hi: i32) -> i32 {
        let span = f64::from(hi) - f64::from(lo);
        let unit = f64::from(self.next_int()) / MODULUS as f64;
        lo + (unit * span).floor() as i32
    }

    /// Pick a random index into a collection of `len` items.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        Some(self.next_range(0, len) as usize)
    }

    /// Pick a random element of `items`.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.choose_index(items.len()).map(|index| &items[index])
    }

    /// Weighted pick: `values[i]` is chosen with probability `weights[i] / sum(weights)`.
    ///
    /// A pool holding each index `weights[i]` times is shuffled and its first entry wins.
    /// Returns `None` if the pool is empty or the winning index has no value.
    pub fn percentage_chance<T: Clone>(&mut self, values: &[T], weights: &[u32]) -> Option<T> {
        let mut pool: Vec<usize> = weights
            .iter()
            .enumerate()
            .flat_map(|(index, weight)| std::iter::repeat(index).take(*weight as usize))
            .collect();
        self.shuffle(&mut pool);
        pool.first().and_then(|index| values.get(*index)).cloned()
    }

    /// Shuffle `items` in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in 0..items.len() {
            // next_float() can return exactly 1.0
            let swap = ((self.next_float() * (i + 1) as f64).floor() as usize).min(i);
            items.swap(i, swap);
        }
    }
}

/// Hash a seed string into the initial generator state.
///
/// Rolling `hash * 31 + code_unit` over UTF-16 code units, wrapped to 32 bits, then the
/// absolute value.
pub fn hash_seed(seed: &str) -> u64 {
    let hash = seed
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    u64::from(hash.unsigned_abs())
}

/// Produce a fresh, non-deterministic seed string for new nodes and projects.
pub fn generate_seed() -> String {
    let mut seed = Uuid::new_v4().simple().to_string();
    seed.truncate(12);
    seed
}
