// Deterministic, portable pseudo-random number generator for Riffgraph.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// Hand-rolled with no RNG crate so that a melody seed reproduces the same
// notes on every platform.
//
// Randomness is consumed through the `RandomSource` trait rather than the
// concrete `RiffRng`. The melody generator, rhythm picker and scale picker all
// take `&mut impl RandomSource`, which lets tests drive them with scripted
// values (see `ScriptedSource` in the music crate's tests).
//
// **Determinism.** `RiffRng::next_u64` must produce identical output given the
// same prior state regardless of platform or optimization level. No floating
// point in the core generator.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed random bits.
///
/// Only `next_u64` is required. The derived helpers can be overridden by
/// test doubles that want to script exact unit-interval values.
pub trait RandomSource {
    /// Next 64 uniformly distributed bits.
    fn next_u64(&mut self) -> u64;

    /// Uniform `f64` in [0, 1), built from the upper 53 bits of `next_u64`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[low, high)` using rejection sampling.
    ///
    /// Panics if `low >= high`.
    fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        // (2^64 - range) % range
        let threshold = range.wrapping_neg() % range;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }
}

/// Xoshiro256++ PRNG, the default `RandomSource`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiffRng {
    s: [u64; 4],
}

impl RiffRng {
    /// Seed a generator from a `u64`, expanded to 256 bits with SplitMix64.
    /// Equal seeds give equal streams.
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

    /// Seed from the wall clock. Used by the CLI when no `--seed` is given.
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::new(nanos)
    }
}

impl RandomSource for RiffRng {
    fn next_u64(&mut self) -> u64 {
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
        let mut a = RiffRng::new(42);
        let mut b = RiffRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = RiffRng::new(42);
        let mut b = RiffRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_in_unit_range() {
        let mut rng = RiffRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "f64 out of range: {v}");
        }
    }

    #[test]
    fn range_usize_within_bounds() {
        let mut rng = RiffRng::new(555);
        for _ in 0..10_000 {
            let v = rng.range_usize(0, 4);
            assert!(v < 4, "range_usize out of range: {v}");
        }
        for _ in 0..10_000 {
            let v = rng.range_usize(5, 15);
            assert!((5..15).contains(&v), "range_usize out of range: {v}");
        }
    }

    #[test]
    fn range_usize_hits_every_value() {
        let mut rng = RiffRng::new(7);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            seen[rng.range_usize(0, 3)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    /// A source that always returns the same bits still gets the default
    /// helpers, and an override of `next_f64` takes precedence.
    #[test]
    fn trait_defaults_and_overrides() {
        struct Fixed(u64);
        impl RandomSource for Fixed {
            fn next_u64(&mut self) -> u64 {
                self.0
            }
        }
        struct Half;
        impl RandomSource for Half {
            fn next_u64(&mut self) -> u64 {
                0
            }
            fn next_f64(&mut self) -> f64 {
                0.5
            }
        }

        assert_eq!(Fixed(0).next_f64(), 0.0);
        assert!(Fixed(u64::MAX).next_f64() < 1.0);
        assert_eq!(Fixed(5).range_usize(0, 4), 1);
        assert_eq!(Half.next_f64(), 0.5);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut rng = RiffRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: RiffRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
