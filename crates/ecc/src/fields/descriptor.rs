//! Modulus descriptors.
//!
//! A descriptor is the immutable, per-curve configuration of a prime field:
//! the modulus with its Montgomery constants, plus the tags that steer the
//! engine (`MBITS`, `MOD8`, `MODTYPE`, `MAXXES`). Descriptors are built at
//! compile time from a [`FieldParams`](super::field_params::FieldParams)
//! implementation and never change afterwards.

use bncx_numeric::{Big, Chunk, BASEBITS, BIGBITS, BMASK, NLEN};
use tracing::debug;

use crate::error::{FieldError, FieldResult};

/// Shape of a modulus, as far as reduction shortcuts are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModType {
    /// No usable structure; general Montgomery reduction.
    NotSpecial,
    /// `p = 2^MBITS - c` for a single-limb `c`.
    PseudoMersenne,
    /// `p = k * 2^(BASEBITS * (NLEN - 1)) - 1`.
    MontgomeryFriendly,
}

/// Immutable description of one prime field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModulusDescriptor {
    pub name: &'static str,
    pub modulus: Big,
    pub r_squared: Big,
    pub mconst: Chunk,
    pub mbits: usize,
    pub mod8: u32,
    pub modtype: ModType,
    pub maxxes: u32,
}

impl ModulusDescriptor {
    /// Spare bits above the modulus in a `Big`.
    pub fn headroom(&self) -> usize {
        BIGBITS.saturating_sub(self.mbits)
    }

    /// Recompute every derived constant and check it against the stored one.
    ///
    /// Any disagreement is a [`FieldError::ConfigurationMismatch`]: an
    /// engine built on such a descriptor would silently compute garbage.
    pub fn verify(&self) -> FieldResult<()> {
        let p = &self.modulus;

        if p.w.iter().any(|&limb| limb > BMASK) {
            return self.mismatch("modulus limbs are not normalised".to_string());
        }
        if p.parity() == 0 || p.nbits() < 3 {
            return self.mismatch("modulus must be odd and at least 5".to_string());
        }
        if p.nbits() != self.mbits {
            return self.mismatch(format!("MBITS is {} but the modulus has {} bits", self.mbits, p.nbits()));
        }
        if (p.w[0] & 7) as u32 != self.mod8 {
            return self.mismatch(format!("MOD8 is {} but p mod 8 is {}", self.mod8, p.w[0] & 7));
        }
        if self.maxxes == 0 || self.maxxes as usize > self.headroom() {
            return self.mismatch(format!(
                "MAXXES {} does not fit the {} bits of headroom",
                self.maxxes,
                self.headroom()
            ));
        }
        if (p.w[0].wrapping_mul(self.mconst).wrapping_add(1)) & BMASK != 0 {
            return self.mismatch("Montgomery constant is not -1/p mod 2^56".to_string());
        }
        if pow2_mod(2 * BIGBITS, p) != self.r_squared {
            return self.mismatch("R^2 mod p is wrong".to_string());
        }
        match self.modtype {
            ModType::NotSpecial => {}
            ModType::PseudoMersenne => {
                let c = Big::ONE.shl(self.mbits).sub(p);
                if c.nbits() > BASEBITS {
                    return self.mismatch("modulus is not pseudo-Mersenne".to_string());
                }
            }
            ModType::MontgomeryFriendly => {
                if p.w[..NLEN - 1].iter().any(|&limb| limb != BMASK) {
                    return self.mismatch("modulus is not Montgomery-friendly".to_string());
                }
            }
        }

        debug!(field = self.name, mbits = self.mbits, mod8 = self.mod8, maxxes = self.maxxes, "modulus descriptor verified");
        Ok(())
    }

    /// Fail unless `other` describes the same field as `self`.
    pub fn ensure_same(&self, other: &ModulusDescriptor) -> FieldResult<()> {
        if self == other {
            return Ok(());
        }
        self.mismatch(format!("element of {} used where {} was expected", other.name, self.name))
    }

    fn mismatch(&self, reason: String) -> FieldResult<()> {
        debug!(field = self.name, %reason, "modulus descriptor rejected");
        Err(FieldError::ConfigurationMismatch(format!("{}: {}", self.name, reason)))
    }
}

/// 2^k mod p by repeated doubling.
fn pow2_mod(k: usize, p: &Big) -> Big {
    let mut x = Big::ONE;
    for _ in 0..k {
        x = x.add(&x).cond_sub(p);
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pow2_mod_small_modulus() {
        let p = Big::from_u64(97);
        // 2^10 = 1024 = 10 * 97 + 54
        assert_eq!(pow2_mod(10, &p), Big::from_u64(54));
        assert_eq!(pow2_mod(0, &p), Big::ONE);
    }
}
