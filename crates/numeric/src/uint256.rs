// Interop with `crypto_bigint` fixed-width integers.
//
// The field layer hands canonical values out as `crypto_bigint::U256` and
// accepts any `Uint<L>` as input; this module converts between those
// radix-2^64 words and the radix-2^56 limbs of [`Big`].

use crypto_bigint::Uint;

use crate::big::{Big, DBig};

/// 256-bit unsigned integer, backed by `crypto_bigint::U256`.
pub type U256 = Uint<4>;

/// 512-bit unsigned integer.
pub type U512 = Uint<8>;

/// Conversion helpers for U256.
pub trait U256Ext {
    /// Construct from 4 x u64 limbs in little-endian limb order.
    fn from_limbs(limbs: [u64; 4]) -> Self;

    /// Access the raw u64 limbs in little-endian limb order.
    fn limbs(&self) -> [u64; 4];

    /// Repack into radix-2^56 limbs.
    fn to_big(&self) -> Big;

    /// The low 256 bits of `b`.
    fn from_big(b: &Big) -> Self;
}

impl U256Ext for U256 {
    fn from_limbs(limbs: [u64; 4]) -> Self {
        U256::from_words(limbs)
    }

    fn limbs(&self) -> [u64; 4] {
        *self.as_words()
    }

    fn to_big(&self) -> Big {
        Big::from_words(self.as_words())
    }

    fn from_big(b: &Big) -> Self {
        U256::from_words(b.to_words())
    }
}

/// The low 512 bits of a double-width product.
pub fn dbig_to_u512(d: &DBig) -> U512 {
    U512::from_words(d.to_words())
}
