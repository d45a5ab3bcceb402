//! Wager randomness.
//!
//! RULE: No game code calls a platform RNG directly. Every play draws
//! from the single Pcg64Mcg stream owned by the engine, so each play is
//! an independent draw from one source. Production seeds the stream from
//! OS entropy; tests seed it explicitly for reproducible outcomes.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct EconRng {
    inner: Pcg64Mcg,
}

impl EconRng {
    pub fn from_entropy() -> Self {
        Self {
            inner: Pcg64Mcg::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Draw a u64 uniformly in [0, n). Rejection-sampled so the result
    /// stays uniform when n does not divide 2^64.
    pub fn below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        let zone = u64::MAX - (u64::MAX % n);
        loop {
            let v = self.inner.next_u64();
            if v < zone {
                return v % n;
            }
        }
    }

    /// Draw uniformly in the inclusive range [lo, hi].
    pub fn range_i64(&mut self, lo: i64, hi: i64) -> i64 {
        debug_assert!(lo <= hi, "range_i64 called with lo > hi");
        lo + self.below((hi - lo) as u64 + 1) as i64
    }
}
