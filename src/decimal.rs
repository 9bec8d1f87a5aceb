//! Comparison of decimals given as `significand × 10^exponent`.
//!
//! Two operands are aligned by comparing `a` against `b × 10^gap`, where `gap`
//! is the exponent difference, without building the scaled value whenever a
//! cheaper argument settles the order:
//!
//! - zero significands are decided by presence alone;
//! - a `u64` against a `u64` scaled by at most `10^19` is decided by one
//!   division and its remainder;
//! - a `u64` can never reach a non-zero value scaled by `10^20` or more;
//! - for multi-precision operands the bit length of `b × 10^gap` is bounded
//!   using `2^(3.3n) < 10^n < 2^(10n/3)`, and the product is only computed
//!   when `a` falls inside that bound.

use crate::mpint::MpInt;
use crate::power::{COMPACT_POWERS_OF_TEN, MAX_COMPACT_EXPONENT, PowerOfTenCache};
use log::trace;
use std::cmp::Ordering;

/// A decimal whose significand fits in 64 bits
#[derive(Debug, Clone, Copy)]
pub struct CompactDecimal {
    significand: u64,
    exponent: i32,
}

/// A decimal with a multi-precision significand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MpDecimal {
    significand: MpInt,
    exponent: i32,
}

/// Either representation, as produced by the wire decoder
#[derive(Debug, Clone)]
pub enum DecimalValue {
    Compact(CompactDecimal),
    Mp(MpDecimal),
}

impl CompactDecimal {
    #[must_use]
    pub const fn new(significand: u64, exponent: i32) -> Self {
        Self {
            significand,
            exponent,
        }
    }

    #[must_use]
    pub const fn significand(&self) -> u64 {
        self.significand
    }

    #[must_use]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.significand == 0
    }

    /// Numeric comparison; never allocates
    #[must_use]
    pub fn compare_to(&self, other: &Self) -> Ordering {
        let (a, b) = (self.significand, other.significand);
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => a.cmp(&b),
            Ordering::Less => compare_compact_scaled(a, b, gap(self.exponent, other.exponent)),
            Ordering::Greater => {
                compare_compact_scaled(b, a, gap(other.exponent, self.exponent)).reverse()
            }
        }
    }

    #[must_use]
    pub fn compare_to_mp(&self, other: &MpDecimal, powers: &PowerOfTenCache) -> Ordering {
        other.compare_to_compact(self, powers).reverse()
    }
}

impl PartialEq for CompactDecimal {
    fn eq(&self, other: &Self) -> bool {
        self.compare_to(other) == Ordering::Equal
    }
}

impl Eq for CompactDecimal {}

impl PartialOrd for CompactDecimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CompactDecimal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare_to(other)
    }
}

impl MpDecimal {
    #[must_use]
    pub const fn new(significand: MpInt, exponent: i32) -> Self {
        Self {
            significand,
            exponent,
        }
    }

    /// Build from an unsigned big-endian significand
    #[must_use]
    pub fn from_be_bytes(bytes: &[u8], exponent: i32) -> Self {
        Self::new(MpInt::from_be_bytes(bytes), exponent)
    }

    #[must_use]
    pub const fn significand(&self) -> &MpInt {
        &self.significand
    }

    #[must_use]
    pub const fn exponent(&self) -> i32 {
        self.exponent
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.significand.is_zero()
    }

    #[must_use]
    pub fn compare_to(&self, other: &Self, powers: &PowerOfTenCache) -> Ordering {
        let (a, b) = (&self.significand, &other.significand);
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => a.compare_to(b),
            Ordering::Less => {
                compare_mp_scaled(a, b, gap(self.exponent, other.exponent), powers)
            }
            Ordering::Greater => {
                compare_mp_scaled(b, a, gap(other.exponent, self.exponent), powers).reverse()
            }
        }
    }

    #[must_use]
    pub fn compare_to_compact(&self, other: &CompactDecimal, powers: &PowerOfTenCache) -> Ordering {
        let (a, b) = (&self.significand, other.significand);
        match self.exponent.cmp(&other.exponent) {
            Ordering::Equal => a.compare_to_u64(b),
            Ordering::Less => {
                compare_mp_with_compact_scaled(a, b, gap(self.exponent, other.exponent), powers)
            }
            Ordering::Greater => {
                compare_compact_with_mp_scaled(b, a, gap(other.exponent, self.exponent)).reverse()
            }
        }
    }
}

impl DecimalValue {
    #[must_use]
    pub fn exponent(&self) -> i32 {
        match self {
            Self::Compact(d) => d.exponent(),
            Self::Mp(d) => d.exponent(),
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Compact(d) => d.is_zero(),
            Self::Mp(d) => d.is_zero(),
        }
    }

    /// Dispatch to the comparison for this pair of representations
    #[must_use]
    pub fn compare(&self, other: &Self, powers: &PowerOfTenCache) -> Ordering {
        match (self, other) {
            (Self::Compact(a), Self::Compact(b)) => a.compare_to(b),
            (Self::Compact(a), Self::Mp(b)) => a.compare_to_mp(b, powers),
            (Self::Mp(a), Self::Compact(b)) => a.compare_to_compact(b, powers),
            (Self::Mp(a), Self::Mp(b)) => a.compare_to(b, powers),
        }
    }
}

impl From<CompactDecimal> for DecimalValue {
    fn from(value: CompactDecimal) -> Self {
        Self::Compact(value)
    }
}

impl From<MpDecimal> for DecimalValue {
    fn from(value: MpDecimal) -> Self {
        Self::Mp(value)
    }
}

/// Compare two compact decimals
#[must_use]
pub fn compare_decimal_compact(
    a_significand: u64,
    a_exponent: i32,
    b_significand: u64,
    b_exponent: i32,
) -> Ordering {
    CompactDecimal::new(a_significand, a_exponent)
        .compare_to(&CompactDecimal::new(b_significand, b_exponent))
}

/// Compare a big-endian significand against a compact decimal
#[must_use]
pub fn compare_decimal_mp_compact(
    a_bytes: &[u8],
    a_exponent: i32,
    b_significand: u64,
    b_exponent: i32,
    powers: &PowerOfTenCache,
) -> Ordering {
    MpDecimal::from_be_bytes(a_bytes, a_exponent)
        .compare_to_compact(&CompactDecimal::new(b_significand, b_exponent), powers)
}

/// Compare two big-endian significands
#[must_use]
pub fn compare_decimal_mp(
    a_bytes: &[u8],
    a_exponent: i32,
    b_bytes: &[u8],
    b_exponent: i32,
    powers: &PowerOfTenCache,
) -> Ordering {
    MpDecimal::from_be_bytes(a_bytes, a_exponent)
        .compare_to(&MpDecimal::from_be_bytes(b_bytes, b_exponent), powers)
}

/// `high - low` for `low < high`; always fits in 32 bits
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn gap(low: i32, high: i32) -> u32 {
    (high as i64 - low as i64) as u32
}

/// `a <=> b × 10^exponent`
fn compare_compact_scaled(a: u64, b: u64, exponent: u32) -> Ordering {
    if a == 0 || b == 0 {
        return a.cmp(&b);
    }
    if exponent <= MAX_COMPACT_EXPONENT {
        // a <=> b*s  is  a/s <=> b, then a remainder means a is past b*s
        let scale = COMPACT_POWERS_OF_TEN[exponent as usize];
        return (a / scale).cmp(&b).then((a % scale).cmp(&0));
    }
    // a < 2^64 < 10^20 <= b*s
    Ordering::Less
}

/// `a <=> b × 10^exponent`
fn compare_compact_with_mp_scaled(a: u64, b: &MpInt, exponent: u32) -> Ordering {
    if a == 0 {
        return if b.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Less
        };
    }
    if b.is_zero() {
        return Ordering::Greater;
    }
    if exponent <= MAX_COMPACT_EXPONENT {
        let scale = COMPACT_POWERS_OF_TEN[exponent as usize];
        return b
            .compare_to_u64(a / scale)
            .reverse()
            .then((a % scale).cmp(&0));
    }
    Ordering::Less
}

/// `a <=> b × 10^exponent`
fn compare_mp_with_compact_scaled(
    a: &MpInt,
    b: u64,
    exponent: u32,
    powers: &PowerOfTenCache,
) -> Ordering {
    if a.is_zero() {
        return 0.cmp(&b);
    }
    if b == 0 {
        return Ordering::Greater;
    }
    if let Some(scaled) = COMPACT_POWERS_OF_TEN
        .get(exponent as usize)
        .and_then(|&scale| b.checked_mul(scale))
    {
        return a.compare_to_u64(scaled);
    }
    compare_mp_scaled(a, &MpInt::from_u64(b), exponent, powers)
}

/// `a <=> b × 10^exponent`
fn compare_mp_scaled(a: &MpInt, b: &MpInt, exponent: u32, powers: &PowerOfTenCache) -> Ordering {
    if exponent == 0 {
        return a.compare_to(b);
    }
    if a.is_zero() {
        return if b.is_zero() {
            Ordering::Equal
        } else {
            Ordering::Less
        };
    }
    if b.is_zero() {
        return Ordering::Greater;
    }

    // fewer bits means smaller, more bits means larger
    let a_bits = a.bits() as u64;
    let (min_bits, max_bits) = scaled_bits_bounds(b.bits() as u64, exponent);
    if a_bits < min_bits {
        return Ordering::Less;
    }
    if a_bits > max_bits {
        return Ordering::Greater;
    }

    trace!(
        "exact decimal comparison: {a_bits} bits against {} bits × 10^{exponent}",
        b.bits()
    );
    if exponent <= 9 {
        // 10^9 < 2^32
        #[allow(clippy::cast_possible_truncation)]
        let scale = COMPACT_POWERS_OF_TEN[exponent as usize] as u32;
        return a.compare_to(&b.mul_u32(scale));
    }
    a.compare_to(&b.mul(powers.get(exponent)))
}

/// Bit-length range of `b × 10^exponent` for a `b` of `bits` bits.
///
/// `10^e` has between `floor(3.3e) + 1` and `ceil(10e/3)` bits, and a product
/// of an m-bit and an n-bit value has `m + n - 1` or `m + n` bits. The lower
/// bound keeps one extra bit of slack.
const fn scaled_bits_bounds(bits: u64, exponent: u32) -> (u64, u64) {
    let exponent = exponent as u64;
    let min_power_bits = exponent * 33 / 10;
    let max_power_bits = (exponent * 10 + 2) / 3;
    (bits + min_power_bits - 1, bits + max_power_bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mp(value: u128, exponent: i32) -> MpDecimal {
        MpDecimal::from_be_bytes(&value.to_be_bytes(), exponent)
    }

    #[test]
    fn test_equal_exponents() {
        assert_eq!(compare_decimal_compact(1, 10, 2, 10), Ordering::Less);
        assert_eq!(compare_decimal_compact(2, 10, 1, 10), Ordering::Greater);
        assert_eq!(compare_decimal_compact(7, -3, 7, -3), Ordering::Equal);
    }

    #[test]
    fn test_aligned_equal_values() {
        // 100 × 10^0 == 10 × 10^1
        assert_eq!(compare_decimal_compact(100, 0, 10, 1), Ordering::Equal);
        assert_eq!(compare_decimal_compact(10, 1, 100, 0), Ordering::Equal);
        assert_eq!(
            compare_decimal_compact(1, 18, 1_000_000_000_000_000_000, 0),
            Ordering::Equal
        );
    }

    #[test]
    fn test_remainder_breaks_quotient_tie() {
        // 101 × 10^0 vs 10 × 10^1: quotient 10 == 10, remainder 1 makes it larger
        assert_eq!(compare_decimal_compact(101, 0, 10, 1), Ordering::Greater);
        assert_eq!(compare_decimal_compact(10, 1, 101, 0), Ordering::Less);
        // 99 × 10^0 vs 10 × 10^1: quotient 9 < 10
        assert_eq!(compare_decimal_compact(99, 0, 10, 1), Ordering::Less);
        assert_eq!(
            compare_decimal_compact(1, 10, 10_000_000_001, 0),
            Ordering::Less
        );
        assert_eq!(
            compare_decimal_compact(1, 10, 9_999_999_999, 0),
            Ordering::Greater
        );
    }

    #[test]
    fn test_zero_ignores_exponent() {
        assert_eq!(compare_decimal_compact(0, 5, 0, -5), Ordering::Equal);
        assert_eq!(compare_decimal_compact(0, 0, 1, 10), Ordering::Less);
        assert_eq!(compare_decimal_compact(1, -40, 0, 40), Ordering::Greater);
    }

    #[test]
    fn test_large_gap_compact() {
        // 1 × 10^20 vs i64::MAX × 10^0
        assert_eq!(
            compare_decimal_compact(1, 20, 9_223_372_036_854_775_807, 0),
            Ordering::Greater
        );
        assert_eq!(
            compare_decimal_compact(1, 20, 9_223_372_036_854_775_807, 2),
            Ordering::Less
        );
        assert_eq!(compare_decimal_compact(u64::MAX, 0, 1, 20), Ordering::Less);
    }

    #[test]
    fn test_extreme_exponent_gap() {
        assert_eq!(compare_decimal_compact(1, i32::MIN, 1, i32::MAX), Ordering::Less);
        assert_eq!(compare_decimal_compact(1, i32::MAX, 1, i32::MIN), Ordering::Greater);
    }

    #[test]
    fn test_compact_against_mp() {
        let powers = PowerOfTenCache::new();
        // 1 × 10^0 vs 9999999999999999999 × 10^-20 (= 0.0999...)
        let a = CompactDecimal::new(1, 0);
        let b = mp(9_999_999_999_999_999_999, -20);
        assert_eq!(a.compare_to_mp(&b, &powers), Ordering::Greater);
        assert_eq!(b.compare_to_compact(&a, &powers), Ordering::Less);

        // 1 × 10^30 vs 10^20 × 10^10
        let c = CompactDecimal::new(1, 30);
        let d = mp(100_000_000_000_000_000_000, 10);
        assert_eq!(c.compare_to_mp(&d, &powers), Ordering::Equal);
        assert_eq!(d.compare_to_compact(&c, &powers), Ordering::Equal);
    }

    #[test]
    fn test_mp_scaled_bound_and_exact_paths() {
        let powers = PowerOfTenCache::new();
        // bit bound decides: 2^100 vs 1 × 10^2
        let big = mp(1 << 100, 0);
        assert_eq!(big.compare_to(&mp(1, 2), &powers), Ordering::Greater);
        // exact path: 10^30 vs 10^10 × 10^20, and one more or less
        let exact = mp(10u128.pow(30), 0);
        assert_eq!(exact.compare_to(&mp(10u128.pow(10), 20), &powers), Ordering::Equal);
        assert_eq!(mp(10u128.pow(30) + 1, 0).compare_to(&mp(10u128.pow(10), 20), &powers), Ordering::Greater);
        assert_eq!(mp(10u128.pow(30) - 1, 0).compare_to(&mp(10u128.pow(10), 20), &powers), Ordering::Less);
    }

    #[test]
    fn test_bounds_contain_actual_bits() {
        let powers = PowerOfTenCache::new();
        for exponent in 1..=120u32 {
            for b in [1u64, 3, 255, 1 << 40, u64::MAX] {
                let b = MpInt::from_u64(b);
                let product = b.mul(powers.get(exponent));
                let (min, max) = scaled_bits_bounds(b.bits() as u64, exponent);
                let bits = product.bits() as u64;
                assert!(min <= bits && bits <= max, "10^{exponent}: {min} <= {bits} <= {max}");
            }
        }
    }

    #[test]
    fn test_decimal_value_dispatch() {
        let powers = PowerOfTenCache::new();
        let values: Vec<DecimalValue> = vec![
            CompactDecimal::new(5, -1).into(),
            mp(5, -1).into(),
            CompactDecimal::new(50, -2).into(),
            mp(500_000_000_000_000_000_000_000, -24).into(),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(a.compare(b, &powers), Ordering::Equal);
            }
        }
    }
}
