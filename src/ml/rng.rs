// ============================================================
// Layer 5 — Random Generator Handle
// ============================================================
// The masking engine draws three kinds of random numbers:
//
//   1. a Bernoulli trial per position   (is it selected?)
//   2. a uniform value in [0, 1)        (how is it replaced?)
//   3. a uniform index                  (which random token?)
//
// All of them go through one MaskingRng handle that the caller
// creates once, from one seed, and threads through every call.
// There is no global random state anywhere in the crate.
//
// Every rand::Rng is a MaskingRng, so a seeded ChaCha8Rng is
// the normal handle. Its stream for a given seed is fixed across
// platforms and rand releases. Tests can implement MaskingRng
// directly to script exact draws.
//
// Reference: rand crate documentation (SeedableRng, Rng)
//            rand_chacha crate documentation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub trait MaskingRng {
    /// True with probability `p`, where `p` is already known to lie in [0, 1].
    fn bernoulli(&mut self, p: f64) -> bool;

    /// Uniform value in [0, 1).
    fn uniform(&mut self) -> f64;

    /// Uniform index in `0..len`, `len > 0`.
    fn index(&mut self, len: usize) -> usize;
}

impl<R: Rng> MaskingRng for R {
    fn bernoulli(&mut self, p: f64) -> bool {
        self.gen_bool(p)
    }

    fn uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Build the process-wide generator from a seed.
///
/// Call once at program entry and pass the handle down; the
/// same seed on the same input always reproduces the same
/// masking output.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    tracing::debug!("Seeding random generator with {}", seed);
    ChaCha8Rng::seed_from_u64(seed)
}
