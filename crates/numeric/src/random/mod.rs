// Random number generation.
//
// Two sources, as in the rest of the workspace:
// - OS entropy through `rand::rng()` for anything secret.
// - `DebugRng`, a deterministic `StdRng` seeded from a u64, so randomised
//   tests replay identically.

use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};

use crate::big::{Big, MODBYTES};

/// Get a random u64 from OS entropy.
pub fn get_random_u64() -> u64 {
    rand::rng().random()
}

/// Fill `dest` from OS entropy.
pub fn fill_random_bytes(dest: &mut [u8]) {
    rand::rng().fill_bytes(dest);
}

/// Deterministic RNG for testing, seeded from a u64.
pub struct DebugRng {
    inner: StdRng,
}

impl DebugRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: StdRng::seed_from_u64(seed) }
    }

    pub fn get_random_u64(&mut self) -> u64 {
        self.inner.random()
    }

    pub fn get_random_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        self.inner.fill_bytes(&mut out);
        out
    }

    /// A uniformly random value below 2^256.
    pub fn get_random_big(&mut self) -> Big {
        Big::from_be_bytes(&self.get_random_bytes::<MODBYTES>())
    }
}

impl RngCore for DebugRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }
}
