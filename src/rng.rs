//! Seed hashing and the seeded generator behind every board.
//!
//! Boards have to come out identical on every device that shares a seed string, so both
//! pieces are fixed algorithms with all arithmetic done modulo 2^32:
//!
//! - [`seed_hash`]: 32-bit FNV-1a over the seed's bytes.
//! - [`Mulberry32`]: a single-word generator whose outputs are normalized to `[0, 1)`
//!   by dividing by 2^32.
//!
//! Every operation here uses `wrapping_*` arithmetic on `u32`. Widening to `u64` anywhere
//! would silently desynchronize boards from other implementations.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 16_777_619;
const MULBERRY_INCREMENT: u32 = 0x6d2b_79f5;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Map a seed string to a 32-bit state with FNV-1a.
pub fn seed_hash(seed: &str) -> u32 {
    seed.bytes().fold(FNV_OFFSET_BASIS, |h, b| {
        (h ^ u32::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Mulberry32 generator.
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    #[must_use]
    pub fn new(state: u32) -> Self {
        Self { state }
    }

    /// Generator seeded from `seed_hash(seed)`.
    #[must_use]
    pub fn from_seed(seed: &str) -> Self {
        Self::new(seed_hash(seed))
    }

    /// Advance the state and return the raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(1 | a);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(61 | t)) ^ t;
        t ^ (t >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / TWO_POW_32
    }

    /// `floor(next_f64() * len)`: a uniform index below `len`.
    ///
    /// Kept in floating point on purpose so that index selection matches the
    /// reference formulation exactly. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot pick an index from an empty range");
        (self.next_f64() * len as f64).floor() as usize
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Fisher–Yates shuffle driven by this generator (from the last index down to 1).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}
