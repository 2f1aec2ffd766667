// Numeric types and operations.
//
// - big: radix-2^56 fixed-width integers (`Big`, `DBig`) and the Montgomery
//   reduction kernel used by the field layer
// - uint256: conversions to and from crypto-bigint `U256`/`U512`
// - random: RNG wrappers

pub mod big;
pub mod random;
pub mod uint256;

pub use big::{Big, Chunk, DBig, BASEBITS, BIGBITS, BMASK, DNLEN, MODBYTES, NLEN};
pub use uint256::{U256, U256Ext, U512};
