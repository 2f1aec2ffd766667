use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bncx_numeric::{Big, DBig, U256, U256Ext, MODBYTES};
use crypto_bigint::subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use crypto_bigint::Uint;
use rand::Rng;
use tracing::trace;

use super::descriptor::ModulusDescriptor;
use super::field_params::FieldParams;
use crate::error::{FieldError, FieldResult};

// ---------------------------------------------------------------------------
// Field<P> struct
// ---------------------------------------------------------------------------

/// A prime field element in Montgomery form, generic over parameters `P`.
///
/// Additions are lazy. `xes` counts the chained additions since the last
/// full reduction and the residue obeys `g < 2^xes * p` (`g < p` when
/// `xes == 0`). `P::MAXXES` bounds `xes`, which keeps `g` inside the 280
/// bits of a `Big`. Any operation that would push an operand past the bound
/// reduces that operand first, so callers never schedule reductions
/// themselves.
///
/// Multiplication always returns a reduced element; so do all constructors.
pub struct Field<P: FieldParams> {
    g: Big,
    xes: u32,
    _phantom: PhantomData<P>,
}

// Manual Clone/Copy because PhantomData<P> doesn't require P: Copy
impl<P: FieldParams> Clone for Field<P> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: FieldParams> Copy for Field<P> {}

impl<P: FieldParams> fmt::Debug for Field<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({})", self)
    }
}

impl<P: FieldParams> fmt::Display for Field<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.to_canonical_bytes() {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl<P: FieldParams> Default for Field<P> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<P: FieldParams> From<u64> for Field<P> {
    fn from(val: u64) -> Self {
        Self::from_u64(val)
    }
}

impl<P: FieldParams> From<i64> for Field<P> {
    fn from(val: i64) -> Self {
        Self::from_i64(val)
    }
}

impl<P: FieldParams> Field<P> {
    const MODULUS: Big = Big::from_limbs(P::MODULUS);
    const R_SQUARED: Big = Big::from_limbs(P::R_SQUARED);

    /// The descriptor this element type is bound to.
    #[inline]
    pub const fn descriptor() -> ModulusDescriptor {
        P::DESCRIPTOR
    }

    /// Check the parameter set behind this element type.
    pub fn verify_params() -> FieldResult<()> {
        P::DESCRIPTOR.verify()
    }

    #[inline]
    fn from_reduced_big(g: Big) -> Self {
        debug_assert!(g < Self::MODULUS, "reduced residue out of range");
        Self {
            g,
            xes: 0,
            _phantom: PhantomData,
        }
    }

    #[inline]
    fn lazy(g: Big, xes: u32) -> Self {
        debug_assert!(xes <= P::MAXXES, "addition budget exceeded");
        Self {
            g,
            xes,
            _phantom: PhantomData,
        }
    }

    /// Montgomery-reduce a product whose value is below `p * 2^BIGBITS`.
    #[inline]
    fn monty_reduce(d: &DBig) -> Big {
        d.monty(&Self::MODULUS, P::MCONST).cond_sub(&Self::MODULUS)
    }

    /// Convert an integer below 2^BIGBITS into Montgomery form.
    #[inline]
    fn nres(x: &Big) -> Self {
        Self::from_reduced_big(Self::monty_reduce(&x.mul(&Self::R_SQUARED)))
    }
}

// ---------------------------------------------------------------------------
// Constructors and conversions
// ---------------------------------------------------------------------------

impl<P: FieldParams> Field<P> {
    /// Zero element (additive identity). Identical in Montgomery form.
    #[inline]
    pub const fn zero() -> Self {
        Self {
            g: Big::ZERO,
            xes: 0,
            _phantom: PhantomData,
        }
    }

    /// One element (multiplicative identity) in Montgomery form.
    #[inline]
    pub fn one() -> Self {
        Self::from_u64(1)
    }

    #[inline]
    pub fn from_u64(val: u64) -> Self {
        Self::nres(&Big::from_u64(val))
    }

    pub fn from_i64(val: i64) -> Self {
        let magnitude = Self::from_u64(val.unsigned_abs());
        if val < 0 {
            magnitude.negate().reduce()
        } else {
            magnitude
        }
    }

    /// Reduce an integer of any width, given as little-endian 64-bit words.
    ///
    /// Processes 256-bit digits from the most significant end with Horner's
    /// rule, so the input is never rejected.
    pub fn from_words_le(words: &[u64]) -> Self {
        let radix = Self::nres(&Big::ONE.shl(256));
        let mut acc = Self::zero();
        for digit in words.chunks(4).rev() {
            acc = Self::add(&acc.montgomery_mul(&radix), &Self::nres(&Big::from_words(digit)));
        }
        acc.reduce()
    }

    /// Reduce a big-endian byte string of any length.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Self {
        let words: Vec<u64> = bytes
            .rchunks(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf[8 - chunk.len()..].copy_from_slice(chunk);
                u64::from_be_bytes(buf)
            })
            .collect();
        Self::from_words_le(&words)
    }

    /// Reduce a `crypto_bigint` integer of any width.
    pub fn from_uint<const L: usize>(value: &Uint<L>) -> Self {
        Self::from_words_le(value.as_words())
    }

    /// Decode exactly [`MODBYTES`] big-endian bytes, rejecting values `>= p`.
    pub fn from_canonical_bytes(bytes: &[u8; MODBYTES]) -> FieldResult<Self> {
        let x = Big::from_be_bytes(bytes);
        if x >= Self::MODULUS {
            return Err(FieldError::NonCanonical);
        }
        Ok(Self::nres(&x))
    }

    /// Decode bytes that were produced under `desc`, which must be the
    /// descriptor of this element type.
    pub fn decode_with(desc: &ModulusDescriptor, bytes: &[u8; MODBYTES]) -> FieldResult<Self> {
        P::DESCRIPTOR.ensure_same(desc)?;
        Self::from_canonical_bytes(bytes)
    }

    /// The canonical integer value in `[0, p)`.
    pub fn to_big(&self) -> Big {
        Self::monty_reduce(&DBig::from_big(&self.reduce().g))
    }

    pub fn to_uint(&self) -> U256 {
        U256::from_big(&self.to_big())
    }

    /// Big-endian encoding of the canonical value. Reduces first if needed.
    pub fn to_canonical_bytes(&self) -> [u8; MODBYTES] {
        self.to_big().to_be_bytes()
    }

    /// Uniform element from 512 random bits.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let words: [u64; 8] = std::array::from_fn(|_| rng.random::<u64>());
        Self::from_words_le(&words)
    }
}

// ---------------------------------------------------------------------------
// Core arithmetic
// ---------------------------------------------------------------------------

impl<P: FieldParams> Field<P> {
    /// Chained additions since the last full reduction.
    #[inline]
    pub fn pending_additions(&self) -> u32 {
        self.xes
    }

    #[inline]
    pub fn is_reduced(&self) -> bool {
        self.xes == 0
    }

    /// Full reduction to `[0, p)`.
    ///
    /// Binary long division by `p * 2^k` for `k = xes-1 .. 0`, one
    /// conditional subtraction per step. Runs in time that depends only on
    /// `xes`.
    pub fn reduce(&self) -> Self {
        let mut g = self.g;
        for k in (0..self.xes as usize).rev() {
            g = g.cond_sub(&Self::MODULUS.shl(k));
        }
        Self::from_reduced_big(g)
    }

    /// Reduce `self` when one more chained addition would exceed `MAXXES`.
    #[inline]
    fn make_room(&self) -> Self {
        if self.xes >= P::MAXXES {
            trace!(field = P::NAME, xes = self.xes, "addition budget exhausted, reducing operand");
            self.reduce()
        } else {
            *self
        }
    }

    /// `2^xes * p - g`, a residue of `-self` no larger than `2^xes * p`.
    #[inline]
    fn negation_offset(&self) -> Big {
        Self::MODULUS.shl(self.xes as usize).sub(&self.g)
    }

    /// Lazy addition. The result carries `max(xes) + 1`.
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        let a = self.make_room();
        let b = other.make_room();
        Self::lazy(a.g.add(&b.g), a.xes.max(b.xes) + 1)
    }

    /// Lazy subtraction, `self + (-other)`. Same budget cost as [`add`](Self::add).
    #[inline]
    pub fn subtract(&self, other: &Self) -> Self {
        let a = self.make_room();
        let b = other.make_room();
        Self::lazy(a.g.add(&b.negation_offset()), a.xes.max(b.xes) + 1)
    }

    /// `-self`, computed as `0 - self`.
    #[inline]
    pub fn negate(&self) -> Self {
        Self::zero().subtract(self)
    }

    #[inline]
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Montgomery multiplication. Always returns a reduced element.
    ///
    /// The product of the residues must stay below `p * 2^BIGBITS` for the
    /// reduction to land in `[0, 2p)`, which holds while the operands' `xes`
    /// sum to at most `MAXXES`. Otherwise the deeper operand is reduced first.
    pub fn montgomery_mul(&self, other: &Self) -> Self {
        let (a, b) = if self.xes + other.xes <= P::MAXXES {
            (*self, *other)
        } else {
            trace!(field = P::NAME, lhs = self.xes, rhs = other.xes, "reducing operand before multiplication");
            if self.xes >= other.xes {
                (self.reduce(), *other)
            } else {
                (*self, other.reduce())
            }
        };
        Self::from_reduced_big(Self::monty_reduce(&a.g.mul(&b.g)))
    }

    /// Montgomery squaring.
    pub fn sqr(&self) -> Self {
        let a = if 2 * self.xes > P::MAXXES { self.reduce() } else { *self };
        Self::from_reduced_big(Self::monty_reduce(&a.g.sqr()))
    }

    /// Check if zero, whatever the pending additions.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.reduce().g.is_zero()
    }

    /// Parity of the canonical integer.
    pub fn is_odd(&self) -> bool {
        self.to_big().parity() == 1
    }

    /// `self / 2`.
    pub fn div2(&self) -> Self {
        let a = self.reduce();
        let odd = Choice::from(a.g.parity() as u8);
        let g = Big::conditional_select(&a.g, &a.g.add(&Self::MODULUS), odd);
        Self::from_reduced_big(g.shr(1))
    }

    /// Exponentiation via square-and-multiply over a public exponent.
    pub fn pow(&self, exp: &Big) -> Self {
        let nbits = exp.nbits();
        if nbits == 0 {
            return Self::one();
        }
        let base = self.reduce();
        let mut accumulator = base;
        for i in (0..nbits - 1).rev() {
            accumulator = accumulator.sqr();
            if exp.bit(i) == 1 {
                accumulator = accumulator.montgomery_mul(&base);
            }
        }
        accumulator
    }

    /// Modular inverse via Fermat's little theorem: self^(p-2) mod p.
    pub fn invert(&self) -> FieldResult<Self> {
        if self.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        Ok(self.pow(&Self::MODULUS.sub(&Big::from_u64(2))))
    }

    /// Euler's criterion. Zero counts as a square.
    pub fn is_square(&self) -> bool {
        let legendre = self.pow(&Self::MODULUS.sub(&Big::ONE).shr(1));
        legendre.is_zero() || legendre == Self::one()
    }

    /// Square root, with the method picked by `P::MOD8`.
    ///
    /// - p = 3 or 7 mod 8: `self^((p+1)/4)`
    /// - p = 5 mod 8: Atkin's formula
    /// - p = 1 mod 8: Tonelli-Shanks (variable time)
    ///
    /// The candidate is squared and compared against `self`; a mismatch means
    /// `self` is a non-residue.
    pub fn sqrt(&self) -> FieldResult<Self> {
        let a = self.reduce();
        let root = match P::MOD8 {
            3 | 7 => a.pow(&Self::MODULUS.add(&Big::ONE).shr(2)),
            5 => a.atkin_sqrt(),
            _ => a.tonelli_shanks_sqrt(),
        };
        if root.sqr() == a {
            Ok(root)
        } else {
            Err(FieldError::NoSquareRoot)
        }
    }

    /// v = (2a)^((p-5)/8), i = 2a*v^2, root = a*v*(i-1).
    fn atkin_sqrt(&self) -> Self {
        let two_a = self.double();
        let v = two_a.pow(&Self::MODULUS.sub(&Big::from_u64(5)).shr(3));
        let i = two_a.montgomery_mul(&v.sqr());
        self.montgomery_mul(&v).montgomery_mul(&i.subtract(&Self::one()))
    }

    fn tonelli_shanks_sqrt(&self) -> Self {
        // Factor p-1 = q * 2^s
        let p_minus_one = Self::MODULUS.sub(&Big::ONE);
        let mut s = 0usize;
        while p_minus_one.bit(s) == 0 {
            s += 1;
        }
        let q = p_minus_one.shr(s);

        // Find a non-residue z (try 2, 3, 4, ...)
        let mut z_val = 2u64;
        let z = loop {
            let z = Self::from_u64(z_val);
            if !z.is_square() {
                break z;
            }
            z_val += 1;
        };

        let one = Self::one();
        let mut m = s;
        let mut c = z.pow(&q);
        let mut t = self.pow(&q);
        let mut r = self.pow(&q.add(&Big::ONE).shr(1));

        loop {
            if t.is_zero() {
                return Self::zero();
            }
            if t == one {
                return r;
            }
            // Least i with t^(2^i) = 1; reaching m means a non-residue.
            let mut i = 1usize;
            let mut tmp = t.sqr();
            while tmp != one {
                tmp = tmp.sqr();
                i += 1;
                if i >= m {
                    return r;
                }
            }
            let mut b = c;
            for _ in 0..m - i - 1 {
                b = b.sqr();
            }
            m = i;
            c = b.sqr();
            t = t.montgomery_mul(&c);
            r = r.montgomery_mul(&b);
        }
    }
}

// ---------------------------------------------------------------------------
// Constant-time traits
// ---------------------------------------------------------------------------

impl<P: FieldParams> ConditionallySelectable for Field<P> {
    #[inline]
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            g: Big::conditional_select(&a.g, &b.g, choice),
            xes: u32::conditional_select(&a.xes, &b.xes, choice),
            _phantom: PhantomData,
        }
    }
}

impl<P: FieldParams> ConstantTimeEq for Field<P> {
    #[inline]
    fn ct_eq(&self, other: &Self) -> Choice {
        self.reduce().g.ct_eq(&other.reduce().g)
    }
}

// ---------------------------------------------------------------------------
// Operator impls
// ---------------------------------------------------------------------------

impl<P: FieldParams> Add for Field<P> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Field::add(&self, &rhs)
    }
}

impl<P: FieldParams> AddAssign for Field<P> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = Field::add(self, &rhs);
    }
}

impl<P: FieldParams> Sub for Field<P> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Field::subtract(&self, &rhs)
    }
}

impl<P: FieldParams> SubAssign for Field<P> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = Field::subtract(self, &rhs);
    }
}

impl<P: FieldParams> Mul for Field<P> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Field::montgomery_mul(&self, &rhs)
    }
}

impl<P: FieldParams> MulAssign for Field<P> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = Field::montgomery_mul(self, &rhs);
    }
}

impl<P: FieldParams> Neg for Field<P> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Field::negate(&self)
    }
}

/// Compares canonical values.
impl<P: FieldParams> PartialEq for Field<P> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.ct_eq(other))
    }
}

impl<P: FieldParams> Eq for Field<P> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::bn254cx::{Bn254CxFpParams, Fp};

    const MAXXES: u32 = Bn254CxFpParams::MAXXES;

    /// An element whose residue is p - 1, the largest reduced residue.
    fn largest_residue() -> Fp {
        Fp::from_reduced_big(Fp::MODULUS.sub(&Big::ONE))
    }

    #[test]
    fn maxxes_doublings_stay_lazy_and_fit() {
        let x = largest_residue();
        let mut acc = x;
        for i in 1..=MAXXES {
            acc = acc.double();
            assert_eq!(acc.pending_additions(), i);
        }
        // No reduction happened: the residue is exactly (p - 1) * 2^MAXXES.
        assert_eq!(acc.g, Fp::MODULUS.sub(&Big::ONE).shl(MAXXES as usize));
        assert!(acc.g.nbits() <= bncx_numeric::BIGBITS);

        let expected = x.montgomery_mul(&Fp::from_u64(1 << MAXXES));
        assert_eq!(acc, expected);
    }

    #[test]
    fn doubling_past_maxxes_reduces_first() {
        let x = largest_residue();
        let mut acc = x;
        for _ in 0..MAXXES {
            acc = acc.double();
        }
        let next = acc.double();
        assert_eq!(next.pending_additions(), 1);
        assert!(next.g < Fp::MODULUS.shl(1));
        assert_eq!(next, x.montgomery_mul(&Fp::from_u64(1 << (MAXXES + 1))));
    }

    #[test]
    fn subtraction_consumes_budget_like_addition() {
        let y = largest_residue();
        let mut by_sub = Fp::zero();
        let mut by_add = Fp::zero();
        for i in 1..=MAXXES {
            by_sub = by_sub.subtract(&y);
            by_add = Fp::add(&by_add, &y);
            assert_eq!(by_sub.pending_additions(), i);
            assert_eq!(by_add.pending_additions(), i);
        }
        assert_eq!(by_sub.subtract(&y).pending_additions(), 1);
        assert_eq!(Fp::add(&by_add, &y).pending_additions(), 1);
        assert_eq!(by_sub, -by_add);
    }

    #[test]
    fn negation_consumes_budget_like_addition() {
        let mut x = largest_residue();
        for i in 1..=MAXXES {
            x = x.negate();
            assert_eq!(x.pending_additions(), i);
        }
        // An even number of negations.
        assert_eq!(x, largest_residue());
        assert_eq!(x.negate().pending_additions(), 1);
    }

    #[test]
    fn mul_accepts_operands_within_budget() {
        let mut a = largest_residue();
        for _ in 0..13 {
            a = a.double();
        }
        let mut b = largest_residue();
        for _ in 0..13 {
            b = b.double();
        }
        assert_eq!(a.pending_additions() + b.pending_additions(), MAXXES);
        let product = a.montgomery_mul(&b);
        assert!(product.is_reduced());
        assert_eq!(product, a.reduce().montgomery_mul(&b.reduce()));
    }

    #[test]
    fn mul_reduces_deeper_operand_over_budget() {
        let mut a = largest_residue();
        for _ in 0..MAXXES {
            a = a.double();
        }
        let b = largest_residue().double();
        let product = a.montgomery_mul(&b);
        assert!(product.g < Fp::MODULUS);
        assert_eq!(product, a.reduce().montgomery_mul(&b.reduce()));
        let sq = a.sqr();
        assert_eq!(sq, a.reduce().sqr());
    }

    #[test]
    fn reduce_lands_below_modulus() {
        let mut a = largest_residue();
        for _ in 0..MAXXES {
            a = Fp::add(&a, &largest_residue());
        }
        let r = a.reduce();
        assert!(r.is_reduced());
        assert!(r.g < Fp::MODULUS);
    }

    #[test]
    fn negation_offset_of_zero_is_modulus() {
        assert_eq!(Fp::zero().negation_offset(), Fp::MODULUS);
        assert!(Fp::zero().negate().is_zero());
    }
}
