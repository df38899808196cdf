// Deterministic, portable pseudo-random number generator.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) seeded via SplitMix64.
// Hand-rolled with no external RNG dependency so that a composition seed
// produces the same byte stream on every platform and compiler version.
//
// This crate is the single source of randomness for the Nocturne piano
// generator: every musical decision (chord roots, rhythm sampling, melody
// pitches, velocities) draws from a `SongRng` owned by the composer.
// Identical seeds must yield identical compositions, so nothing in here may
// use floating-point arithmetic, the stdlib RNG, or any ambient entropy.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG — the generator behind every musical decision.
///
/// Serializable so a composition's random state can be captured alongside
/// its configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SongRng {
    s: [u64; 4],
}

impl SongRng {
    /// Create a generator from a `u64` seed, expanding it into the 256-bit
    /// internal state with SplitMix64. Equal seeds give equal sequences.
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

    /// Next `u64` in the sequence.
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

    /// Uniform integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias. Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        // Rejection sampling to avoid modulo bias.
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Uniform `u8` in `[low, high]`, inclusive on both ends.
    ///
    /// Used for velocity sampling, where `low == high` is a valid
    /// (constant-velocity) configuration. Panics if `low > high`.
    pub fn range_u8_inclusive(&mut self, low: u8, high: u8) -> u8 {
        assert!(low <= high, "range_u8_inclusive: low must be <= high");
        self.range_u64(low as u64, high as u64 + 1) as u8
    }

    /// A percentage draw in `0..100`, for weighted-table selection.
    pub fn percent(&mut self) -> u32 {
        self.range_u64(0, 100) as u32
    }

    /// A uniformly chosen element of a non-empty slice.
    ///
    /// Panics if the slice is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        assert!(!items.is_empty(), "pick: slice must be non-empty");
        &items[self.range_usize(0, items.len())]
    }
}

/// SplitMix64, used only to expand a small seed into xoshiro state.
/// This is the seeding scheme recommended by the xoshiro authors.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
