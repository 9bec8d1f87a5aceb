//! Unsigned multi-precision integers for decimal significands.
//!
//! Only the operations needed to compare scaled decimals are provided:
//! construction, multiplication and comparison. There is no subtraction or
//! division.

use std::cmp::Ordering;
use std::ops::Mul;

/// An unsigned integer stored as little-endian 32-bit limbs.
///
/// The most significant limb is never zero; zero is the empty limb sequence.
/// Because of that invariant the derived equality is value equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MpInt {
    limbs: Vec<u32>,
}

impl MpInt {
    /// The value zero (no limbs)
    #[must_use]
    pub const fn zero() -> Self {
        Self { limbs: Vec::new() }
    }

    /// Build from a 64-bit value, producing zero, one or two limbs
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_u64(value: u64) -> Self {
        let lo = value as u32;
        let hi = (value >> 32) as u32;
        let limbs = if hi != 0 {
            vec![lo, hi]
        } else if lo != 0 {
            vec![lo]
        } else {
            Vec::new()
        };
        Self { limbs }
    }

    /// Build from an unsigned big-endian magnitude.
    ///
    /// Leading zero bytes are ignored, so `[0, 0, 1]` and `[1]` produce the
    /// same value. The remaining bytes are grouped into limbs from the tail.
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        let limbs: Vec<u32> = bytes[start..]
            .rchunks(4)
            .map(|chunk| chunk.iter().fold(0u32, |acc, &b| acc << 8 | u32::from(b)))
            .collect();
        debug_assert!(limbs.last().is_none_or(|&top| top != 0));
        Self { limbs }
    }

    fn from_limbs(mut limbs: Vec<u32>) -> Self {
        while limbs.last() == Some(&0) {
            limbs.pop();
        }
        Self { limbs }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Little-endian limbs, most significant limb last
    #[must_use]
    pub fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    /// Position of the highest set bit plus one, or 0 for zero
    #[must_use]
    pub fn bits(&self) -> usize {
        self.limbs
            .last()
            .map_or(0, |top| self.limbs.len() * 32 - top.leading_zeros() as usize)
    }

    /// The value as a `u64`, if it fits
    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        match *self.limbs.as_slice() {
            [] => Some(0),
            [lo] => Some(u64::from(lo)),
            [lo, hi] => Some(u64::from(hi) << 32 | u64::from(lo)),
            _ => None,
        }
    }

    /// Minimal big-endian serialization, `ceil(bits() / 8)` bytes long.
    ///
    /// Zero serializes to an empty vector, and the first byte of any other
    /// value is non-zero.
    #[must_use]
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let size = self.bits().div_ceil(8);
        let mut out = Vec::with_capacity(size);
        if let Some((top, rest)) = self.limbs.split_last() {
            let head = size - rest.len() * 4;
            out.extend_from_slice(&top.to_be_bytes()[4 - head..]);
            for limb in rest.iter().rev() {
                out.extend_from_slice(&limb.to_be_bytes());
            }
        }
        debug_assert_eq!(out.len(), size);
        out
    }

    /// Multiply by a single limb
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn mul_u32(&self, multiplier: u32) -> Self {
        if multiplier == 0 || self.is_zero() {
            return Self::zero();
        }
        if multiplier == 1 {
            return self.clone();
        }
        if self.bits() == 1 {
            return Self::from_u64(u64::from(multiplier));
        }

        let multiplier = u64::from(multiplier);
        let mut limbs = Vec::with_capacity(self.limbs.len() + 1);
        let mut carry = 0u64;
        for &limb in &self.limbs {
            // (2^32-1)^2 + (2^32-1) < 2^64
            carry += u64::from(limb) * multiplier;
            limbs.push(carry as u32);
            carry >>= 32;
        }
        if carry != 0 {
            limbs.push(carry as u32);
        }
        Self::from_limbs(limbs)
    }

    /// Schoolbook multiplication.
    ///
    /// The operand with fewer limbs drives the outer loop. Operands equal to
    /// one return the other operand without any arithmetic.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let (short, long) = if self.limbs.len() <= other.limbs.len() {
            (self, other)
        } else {
            (other, self)
        };
        if short.bits() == 1 {
            return long.clone();
        }
        if long.bits() == 1 {
            return short.clone();
        }

        let width = long.limbs.len();
        let mut out = vec![0u32; short.limbs.len() + width];
        for (i, &a) in short.limbs.iter().enumerate() {
            let a = u64::from(a);
            let mut carry = 0u64;
            for (j, &b) in long.limbs.iter().enumerate() {
                let slot = &mut out[i + j];
                // a*b + slot + carry <= 2^64 - 1
                carry += a * u64::from(b) + u64::from(*slot);
                *slot = carry as u32;
                carry >>= 32;
            }
            let mut k = i + width;
            while carry != 0 {
                let slot = &mut out[k];
                carry += u64::from(*slot);
                *slot = carry as u32;
                carry >>= 32;
                k += 1;
            }
        }
        Self::from_limbs(out)
    }

    /// Compare against a 64-bit value without allocating
    #[must_use]
    pub fn compare_to_u64(&self, other: u64) -> Ordering {
        self.to_u64().map_or(Ordering::Greater, |value| value.cmp(&other))
    }

    /// Compare bit lengths first, then limbs from the most significant end
    #[must_use]
    pub fn compare_to(&self, other: &Self) -> Ordering {
        self.bits().cmp(&other.bits()).then_with(|| {
            debug_assert_eq!(self.limbs.len(), other.limbs.len());
            self.limbs.iter().rev().cmp(other.limbs.iter().rev())
        })
    }
}

impl From<u64> for MpInt {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl PartialEq<u64> for MpInt {
    fn eq(&self, other: &u64) -> bool {
        self.compare_to_u64(*other) == Ordering::Equal
    }
}

impl PartialOrd for MpInt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MpInt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl Mul<u32> for &MpInt {
    type Output = MpInt;

    fn mul(self, rhs: u32) -> MpInt {
        self.mul_u32(rhs)
    }
}

impl Mul<&MpInt> for &MpInt {
    type Output = MpInt;

    fn mul(self, rhs: &MpInt) -> MpInt {
        MpInt::mul(self, rhs)
    }
}
