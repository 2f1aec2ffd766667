// Fixed-width multi-precision integers in radix 2^56.
//
// This is the BIG_256_56 configuration: five 56-bit limbs (280 bits of
// storage) for moduli up to 256 bits. The spare high bits are what lets the
// field layer defer reductions. Limbs are little-endian `u64` words; partial
// products are accumulated in `u128`.

use std::cmp::Ordering;
use std::fmt;

use crypto_bigint::subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Storage word for one limb.
pub type Chunk = u64;

/// Significant bits per normalised limb.
pub const BASEBITS: usize = 56;
/// Limbs in a [`Big`].
pub const NLEN: usize = 5;
/// Limbs in a [`DBig`].
pub const DNLEN: usize = 2 * NLEN;
/// Mask selecting the significant bits of a limb.
pub const BMASK: Chunk = (1 << BASEBITS) - 1;
/// Bytes in the external (serialised) form.
pub const MODBYTES: usize = 32;
/// Total bits of storage in a [`Big`].
pub const BIGBITS: usize = BASEBITS * NLEN;

// ---------------------------------------------------------------------------
// Big
// ---------------------------------------------------------------------------

/// An unsigned integer of up to [`BIGBITS`] bits.
///
/// A value is *normalised* when every limb except the top one is below
/// 2^56. All constructors and arithmetic below return normalised values; the
/// top limb is left unmasked so a carry out of bit 279 is never lost.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Big {
    pub w: [Chunk; NLEN],
}

impl Big {
    pub const ZERO: Big = Big { w: [0; NLEN] };
    pub const ONE: Big = Big { w: [1, 0, 0, 0, 0] };

    /// Construct from limbs that are already in radix 2^56.
    #[inline]
    pub const fn from_limbs(w: [Chunk; NLEN]) -> Self {
        Self { w }
    }

    #[inline]
    pub const fn from_u64(v: u64) -> Self {
        let mut w = [0; NLEN];
        w[0] = v & BMASK;
        w[1] = v >> BASEBITS;
        Self { w }
    }

    /// Repack little-endian 64-bit words into 56-bit limbs.
    ///
    /// Bits at or above [`BIGBITS`] are discarded.
    pub fn from_words(words: &[u64]) -> Self {
        let mut r = Big::ZERO;
        let mut acc: u128 = 0;
        let mut acc_bits = 0usize;
        let mut idx = 0usize;
        for &word in words {
            acc |= (word as u128) << acc_bits;
            acc_bits += 64;
            while acc_bits >= BASEBITS && idx < NLEN {
                r.w[idx] = (acc as u64) & BMASK;
                acc >>= BASEBITS;
                acc_bits -= BASEBITS;
                idx += 1;
            }
            if idx == NLEN {
                return r;
            }
        }
        r.w[idx] = (acc as u64) & BMASK;
        r
    }

    /// The low 256 bits as little-endian 64-bit words.
    pub fn to_words(&self) -> [u64; 4] {
        let mut out = [0u64; 4];
        let mut acc: u128 = 0;
        let mut acc_bits = 0usize;
        let mut idx = 0usize;
        for &limb in &self.w {
            acc |= (limb as u128) << acc_bits;
            acc_bits += BASEBITS;
            while acc_bits >= 64 && idx < 4 {
                out[idx] = acc as u64;
                acc >>= 64;
                acc_bits -= 64;
                idx += 1;
            }
        }
        if idx < 4 {
            out[idx] = acc as u64;
        }
        out
    }

    /// Read a big-endian byte string of exactly [`MODBYTES`] bytes.
    pub fn from_be_bytes(bytes: &[u8; MODBYTES]) -> Self {
        let mut words = [0u64; 4];
        for (i, chunk) in bytes.rchunks(8).enumerate() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            words[i] = u64::from_be_bytes(buf);
        }
        Self::from_words(&words)
    }

    /// Write the low 256 bits as big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; MODBYTES] {
        let words = self.to_words();
        let mut bytes = [0u8; MODBYTES];
        bytes[0..8].copy_from_slice(&words[3].to_be_bytes());
        bytes[8..16].copy_from_slice(&words[2].to_be_bytes());
        bytes[16..24].copy_from_slice(&words[1].to_be_bytes());
        bytes[24..32].copy_from_slice(&words[0].to_be_bytes());
        bytes
    }

    /// Propagate carries so that every limb below the top one fits in 56 bits.
    #[inline]
    pub fn norm(&mut self) {
        let mut carry = 0;
        for i in 0..NLEN - 1 {
            let d = self.w[i] + carry;
            self.w[i] = d & BMASK;
            carry = d >> BASEBITS;
        }
        self.w[NLEN - 1] += carry;
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.w.iter().fold(0, |acc, &x| acc | x) == 0
    }

    #[inline]
    pub fn parity(&self) -> Chunk {
        self.w[0] & 1
    }

    /// Bit `n` of the value (0 or 1).
    #[inline]
    pub fn bit(&self, n: usize) -> Chunk {
        (self.w[n / BASEBITS] >> (n % BASEBITS)) & 1
    }

    /// Number of significant bits; zero for zero.
    pub fn nbits(&self) -> usize {
        for i in (0..NLEN).rev() {
            if self.w[i] != 0 {
                return i * BASEBITS + (64 - self.w[i].leading_zeros() as usize);
            }
        }
        0
    }

    #[inline]
    pub fn add(&self, y: &Big) -> Big {
        let mut r = Big::ZERO;
        for i in 0..NLEN {
            r.w[i] = self.w[i] + y.w[i];
        }
        r.norm();
        r
    }

    /// `self - y` together with a borrow flag that is 1 when `y > self`.
    ///
    /// On borrow the returned difference is meaningless and must be
    /// discarded; callers select between it and the minuend.
    #[inline]
    pub fn sub_borrow(&self, y: &Big) -> (Big, Chunk) {
        let mut r = Big::ZERO;
        let mut borrow = 0;
        for i in 0..NLEN {
            let t = self.w[i].wrapping_sub(y.w[i]).wrapping_sub(borrow);
            borrow = t >> 63;
            r.w[i] = if i == NLEN - 1 { t } else { t & BMASK };
        }
        (r, borrow)
    }

    /// `self - y`; requires `self >= y`.
    #[inline]
    pub fn sub(&self, y: &Big) -> Big {
        let (r, borrow) = self.sub_borrow(y);
        debug_assert_eq!(borrow, 0, "big integer subtraction underflow");
        r
    }

    /// Subtract `m` when `self >= m`, in constant time.
    #[inline]
    pub fn cond_sub(&self, m: &Big) -> Big {
        let (diff, borrow) = self.sub_borrow(m);
        Big::conditional_select(&diff, self, Choice::from(borrow as u8))
    }

    /// Left shift by `k < BIGBITS` bits. Bits pushed past the top limb are lost.
    pub fn shl(&self, k: usize) -> Big {
        let n = k % BASEBITS;
        let m = k / BASEBITS;
        let mut r = Big::ZERO;
        for i in m..NLEN {
            let src = i - m;
            let hi = self.w[src] << n;
            let lo = if n > 0 && src > 0 {
                self.w[src - 1] >> (BASEBITS - n)
            } else {
                0
            };
            r.w[i] = if i == NLEN - 1 { hi | lo } else { (hi & BMASK) | lo };
        }
        r
    }

    /// Right shift by `k < BIGBITS` bits.
    pub fn shr(&self, k: usize) -> Big {
        let n = k % BASEBITS;
        let m = k / BASEBITS;
        let mut r = Big::ZERO;
        for i in 0..NLEN - m {
            let src = i + m;
            let lo = self.w[src] >> n;
            let hi = if n > 0 && src + 1 < NLEN {
                (self.w[src + 1] << (BASEBITS - n)) & BMASK
            } else {
                0
            };
            r.w[i] = lo | hi;
        }
        r
    }

    /// Schoolbook product, column by column.
    pub fn mul(&self, y: &Big) -> DBig {
        let mut d = DBig::ZERO;
        let mut carry: u128 = 0;
        for k in 0..DNLEN - 1 {
            let mut acc = carry;
            let lo = k.saturating_sub(NLEN - 1);
            let hi = k.min(NLEN - 1);
            for i in lo..=hi {
                acc += self.w[i] as u128 * y.w[k - i] as u128;
            }
            d.w[k] = (acc as u64) & BMASK;
            carry = acc >> BASEBITS;
        }
        d.w[DNLEN - 1] = carry as u64;
        d
    }

    /// Square, computing each cross product once.
    pub fn sqr(&self) -> DBig {
        let mut d = DBig::ZERO;
        let mut carry: u128 = 0;
        for k in 0..DNLEN - 1 {
            let lo = k.saturating_sub(NLEN - 1);
            let (mut i, mut j) = (lo, k - lo);
            let mut acc: u128 = 0;
            while i < j {
                acc += self.w[i] as u128 * self.w[j] as u128;
                i += 1;
                j -= 1;
            }
            acc <<= 1;
            if i == j {
                acc += self.w[i] as u128 * self.w[i] as u128;
            }
            acc += carry;
            d.w[k] = (acc as u64) & BMASK;
            carry = acc >> BASEBITS;
        }
        d.w[DNLEN - 1] = carry as u64;
        d
    }
}

impl PartialOrd for Big {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compares normalised values.
impl Ord for Big {
    fn cmp(&self, other: &Self) -> Ordering {
        for i in (0..NLEN).rev() {
            match self.w[i].cmp(&other.w[i]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl ConditionallySelectable for Big {
    #[inline]
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut r = Big::ZERO;
        for i in 0..NLEN {
            r.w[i] = Chunk::conditional_select(&a.w[i], &b.w[i], choice);
        }
        r
    }
}

impl ConstantTimeEq for Big {
    #[inline]
    fn ct_eq(&self, other: &Self) -> Choice {
        self.w[..].ct_eq(&other.w[..])
    }
}

impl fmt::Debug for Big {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Big(")?;
        for (i, limb) in self.w.iter().rev().enumerate() {
            if i > 0 {
                write!(f, "_")?;
            }
            write!(f, "{:014x}", limb)?;
        }
        write!(f, ")")
    }
}

// ---------------------------------------------------------------------------
// DBig
// ---------------------------------------------------------------------------

/// A double-width product awaiting reduction.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct DBig {
    pub w: [Chunk; DNLEN],
}

impl DBig {
    pub const ZERO: DBig = DBig { w: [0; DNLEN] };

    /// Widen a `Big` (upper half zero).
    #[inline]
    pub fn from_big(b: &Big) -> Self {
        let mut d = DBig::ZERO;
        d.w[..NLEN].copy_from_slice(&b.w);
        d
    }

    /// The low 512 bits as little-endian 64-bit words.
    pub fn to_words(&self) -> [u64; 8] {
        let mut out = [0u64; 8];
        let mut acc: u128 = 0;
        let mut acc_bits = 0usize;
        let mut idx = 0usize;
        for &limb in &self.w {
            acc |= (limb as u128) << acc_bits;
            acc_bits += BASEBITS;
            while acc_bits >= 64 && idx < 8 {
                out[idx] = acc as u64;
                acc >>= 64;
                acc_bits -= 64;
                idx += 1;
            }
        }
        if idx < 8 {
            out[idx] = acc as u64;
        }
        out
    }

    /// Montgomery reduction: returns `self * 2^-BIGBITS mod md`, not fully
    /// reduced.
    ///
    /// `mc` must be `-md^-1 mod 2^56`. For an input `T` the output is below
    /// `T / 2^BIGBITS + md`, so the caller decides how many conditional
    /// subtractions are needed.
    pub fn monty(&self, md: &Big, mc: Chunk) -> Big {
        let mut t = self.w;
        for i in 0..NLEN {
            let m = t[i].wrapping_mul(mc) & BMASK;
            let mut carry: u128 = 0;
            for j in 0..NLEN {
                let s = t[i + j] as u128 + m as u128 * md.w[j] as u128 + carry;
                t[i + j] = (s as u64) & BMASK;
                carry = s >> BASEBITS;
            }
            t[i + NLEN] += carry as u64;
        }
        let mut r = Big::ZERO;
        r.w.copy_from_slice(&t[NLEN..]);
        r.norm();
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // p for the BN254CX base field.
    const P: Big = Big::from_limbs([
        0x6623EF5C1B55B3,
        0xD6EE18093EE1BE,
        0x647A6366D3243F,
        0x08702A0DB0BDDF,
        0x00000024000000,
    ]);
    const MC: Chunk = 0x4E205BF9789E85;

    #[test]
    fn from_u64_splits_across_limbs() {
        let b = Big::from_u64(u64::MAX);
        assert_eq!(b.w[0], BMASK);
        assert_eq!(b.w[1], 0xFF);
        assert_eq!(b.nbits(), 64);
    }

    #[test]
    fn words_roundtrip() {
        let words = [0x1111_2222_3333_4444u64, 0x5555_6666_7777_8888, 0x9999_aaaa_bbbb_cccc, 0x0ddd_eeee_ffff_0000];
        let b = Big::from_words(&words);
        assert_eq!(b.to_words(), words);
        for limb in &b.w[..NLEN - 1] {
            assert!(*limb <= BMASK);
        }
    }

    #[test]
    fn bytes_roundtrip() {
        let mut bytes = [0u8; MODBYTES];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = (i as u8).wrapping_mul(37).wrapping_add(11);
        }
        let b = Big::from_be_bytes(&bytes);
        assert_eq!(b.to_be_bytes(), bytes);
    }

    #[test]
    fn modulus_bit_length() {
        assert_eq!(P.nbits(), 254);
        assert_eq!(P.parity(), 1);
        assert_eq!(P.bit(253), 1);
        assert_eq!(P.bit(254), 0);
    }

    #[test]
    fn add_carries_between_limbs() {
        let a = Big::from_limbs([BMASK, BMASK, 0, 0, 0]);
        let r = a.add(&Big::ONE);
        assert_eq!(r.w, [0, 0, 1, 0, 0]);
    }

    #[test]
    fn sub_borrow_flags_underflow() {
        let (r, borrow) = Big::from_u64(10).sub_borrow(&Big::from_u64(3));
        assert_eq!(borrow, 0);
        assert_eq!(r, Big::from_u64(7));

        let (_, borrow) = Big::from_u64(3).sub_borrow(&Big::from_u64(10));
        assert_eq!(borrow, 1);
    }

    #[test]
    fn sub_borrows_across_limbs() {
        let a = Big::from_limbs([0, 0, 1, 0, 0]);
        assert_eq!(a.sub(&Big::ONE).w, [BMASK, BMASK, 0, 0, 0]);
    }

    #[test]
    fn cond_sub_only_when_not_smaller() {
        let below = P.sub(&Big::ONE);
        assert_eq!(below.cond_sub(&P), below);
        assert_eq!(P.cond_sub(&P), Big::ZERO);
        assert_eq!(P.add(&Big::from_u64(5)).cond_sub(&P), Big::from_u64(5));
    }

    #[test]
    fn shifts_are_inverse() {
        for k in [0usize, 1, 7, 25, 26] {
            let s = P.shl(k);
            assert_eq!(s.nbits(), 254 + k);
            assert_eq!(s.shr(k), P);
        }
    }

    #[test]
    fn ordering_follows_value() {
        let a = Big::from_limbs([BMASK, 0, 0, 0, 1]);
        let b = Big::from_limbs([0, 1, 0, 0, 1]);
        assert!(a < b);
        assert!(P > a);
        assert_eq!(P.cmp(&P), Ordering::Equal);
    }

    #[test]
    fn sqr_matches_mul() {
        let a = P.sub(&Big::from_u64(12345));
        assert_eq!(a.sqr(), a.mul(&a));
        let b = Big::from_limbs([BMASK, BMASK, BMASK, BMASK, BMASK]);
        assert_eq!(b.sqr(), b.mul(&b));
    }

    #[test]
    fn mul_small_values() {
        let d = Big::from_u64(1 << 40).mul(&Big::from_u64(1 << 40));
        assert_eq!(d.w[1], 1 << 24);
        assert_eq!(d.w[0], 0);
    }

    #[test]
    fn monty_of_r_times_x_is_x() {
        // R = 2^280 sits just above the top limb, so build R*x directly.
        let x = Big::from_u64(0xdead_beef);
        let mut d = DBig::ZERO;
        d.w[NLEN..].copy_from_slice(&x.w);
        let r = d.monty(&P, MC).cond_sub(&P);
        assert_eq!(r, x);
    }

    #[test]
    fn monty_of_zero_is_zero() {
        assert_eq!(DBig::ZERO.monty(&P, MC), Big::ZERO);
    }

    #[test]
    fn conditional_select_picks_operand() {
        let a = Big::from_u64(1);
        let b = Big::from_u64(2);
        assert_eq!(Big::conditional_select(&a, &b, Choice::from(0)), a);
        assert_eq!(Big::conditional_select(&a, &b, Choice::from(1)), b);
        assert!(bool::from(a.ct_eq(&a)));
        assert!(!bool::from(a.ct_eq(&b)));
    }
}
