use bncx_numeric::{Big, Chunk, NLEN};

use super::descriptor::{ModType, ModulusDescriptor};

/// Trait defining the parameters for a prime field in Montgomery form.
///
/// All multi-limb constants use 5 x 56-bit limbs in little-endian order.
/// Montgomery form: elements are stored as `a * R mod p` where `R = 2^280`.
pub trait FieldParams: 'static + Send + Sync + Sized {
    /// Curve family name, used in diagnostics.
    const NAME: &'static str;

    /// The prime modulus p.
    const MODULUS: [Chunk; NLEN];

    /// R^2 mod p, used to convert into Montgomery form.
    const R_SQUARED: [Chunk; NLEN];

    /// -(p^{-1}) mod 2^56, used in Montgomery reduction.
    const MCONST: Chunk;

    /// Bit length of p.
    const MBITS: usize;

    /// p mod 8. Selects the square-root method.
    const MOD8: u32;

    /// Shape of the modulus.
    const MODTYPE: ModType;

    /// Chained additions an element may accumulate before it must be reduced.
    /// At most `BIGBITS - MBITS`.
    const MAXXES: u32;

    const DESCRIPTOR: ModulusDescriptor = ModulusDescriptor {
        name: Self::NAME,
        modulus: Big::from_limbs(Self::MODULUS),
        r_squared: Big::from_limbs(Self::R_SQUARED),
        mconst: Self::MCONST,
        mbits: Self::MBITS,
        mod8: Self::MOD8,
        modtype: Self::MODTYPE,
        maxxes: Self::MAXXES,
    };
}
