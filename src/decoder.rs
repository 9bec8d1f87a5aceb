//! Reading and comparing encoded decimals straight from key buffers.
//!
//! Layout of one value:
//!
//! ```text
//! header   u8           0x00 = NULL, otherwise 0x80 | plus? 0x02 | compact? 0x01
//! scale    compact int  exponent = -scale
//! unscaled compact int  compact: the magnitude itself
//!                       extended: byte length of the magnitude that follows
//! [magnitude]           extended only, unsigned big-endian
//! ```

use crate::decimal::{
    CompactDecimal, DecimalValue, MpDecimal, compare_decimal_compact, compare_decimal_mp,
    compare_decimal_mp_compact,
};
use crate::error::{DecodeError, DecodeResult};
use crate::power::PowerOfTenCache;
use crate::varint::ByteReader;
use std::cmp::Ordering;

/// Header of a NULL decimal; nothing follows it
pub const DECIMAL_NULL: u8 = 0x00;
/// Set on every non-null header
pub const DECIMAL_PRESENT: u8 = 0x80;
/// Set for zero and positive values
pub const DECIMAL_PLUS_MASK: u8 = 0x02;
/// Set when the unscaled value is stored inline
pub const DECIMAL_COMPACT_MASK: u8 = 0x01;

/// Unscaled magnitude of an encoded decimal, borrowed from the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Significand<'a> {
    Compact(u64),
    Extended(&'a [u8]),
}

impl Significand<'_> {
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Compact(value) => *value == 0,
            Self::Extended(bytes) => bytes.iter().all(|&b| b == 0),
        }
    }

    /// Extended magnitudes that fit in 64 bits become compact
    #[must_use]
    pub fn narrowed(self) -> Self {
        match self {
            Self::Compact(_) => self,
            Self::Extended(bytes) => {
                let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
                let significant = &bytes[start..];
                if significant.len() > 8 {
                    return Self::Extended(significant);
                }
                let mut buf = [0u8; 8];
                buf[8 - significant.len()..].copy_from_slice(significant);
                Self::Compact(u64::from_be_bytes(buf))
            }
        }
    }
}

/// One decoded decimal field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodedDecimal<'a> {
    Null,
    Value {
        positive: bool,
        exponent: i32,
        significand: Significand<'a>,
    },
}

impl EncodedDecimal<'_> {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Owned magnitude, or `None` for NULL. Extended magnitudes that fit in
    /// 64 bits come back compact.
    #[must_use]
    pub fn magnitude(&self) -> Option<DecimalValue> {
        let Self::Value {
            exponent,
            significand,
            ..
        } = *self
        else {
            return None;
        };
        Some(match significand.narrowed() {
            Significand::Compact(value) => CompactDecimal::new(value, exponent).into(),
            Significand::Extended(bytes) => MpDecimal::from_be_bytes(bytes, exponent).into(),
        })
    }

    /// -1, 0 or 1 for negative, zero and positive values; NULL has no sign
    fn signum(&self) -> i8 {
        match self {
            Self::Null => 0,
            Self::Value { significand, .. } if significand.is_zero() => 0,
            Self::Value { positive: true, .. } => 1,
            Self::Value {
                positive: false, ..
            } => -1,
        }
    }
}

/// Read one decimal and leave the cursor on the byte after it
///
/// # Errors
///
/// Returns [`DecodeError`] if the value is truncated, the scale does not fit
/// a 32-bit exponent, a compact unscaled value is negative, or an extended
/// length is negative.
pub fn read_decimal<'a>(reader: &mut ByteReader<'a>) -> DecodeResult<EncodedDecimal<'a>> {
    let header = reader.read_u8()?;
    if header == DECIMAL_NULL {
        return Ok(EncodedDecimal::Null);
    }

    let scale = reader.read_compact_int()?;
    let exponent = scale
        .checked_neg()
        .and_then(|e| i32::try_from(e).ok())
        .ok_or(DecodeError::ScaleOutOfRange(scale))?;

    let unscaled = reader.read_compact_int()?;
    let significand = if header & DECIMAL_COMPACT_MASK != 0 {
        let value = u64::try_from(unscaled).map_err(|_| DecodeError::NegativeUnscaled(unscaled))?;
        Significand::Compact(value)
    } else {
        let len = usize::try_from(unscaled).map_err(|_| DecodeError::InvalidLength(unscaled))?;
        Significand::Extended(reader.read_bytes(len)?)
    };

    Ok(EncodedDecimal::Value {
        positive: header & DECIMAL_PLUS_MASK != 0,
        exponent,
        significand,
    })
}

/// Advance past one decimal
///
/// # Errors
///
/// Same as [`read_decimal`].
pub fn skip_decimal(reader: &mut ByteReader<'_>) -> DecodeResult<()> {
    read_decimal(reader).map(|_| ())
}

/// Compare the decimals at the two cursors, advancing both past their value.
///
/// NULL sorts first, then negative values, zero, positive values. Both values
/// are read in full before anything is compared.
///
/// # Errors
///
/// Returns [`DecodeError`] if either value is malformed.
pub fn compare_encoded_decimal(
    a: &mut ByteReader<'_>,
    b: &mut ByteReader<'_>,
    powers: &PowerOfTenCache,
) -> DecodeResult<Ordering> {
    let left = read_decimal(a)?;
    let right = read_decimal(b)?;
    Ok(compare_decoded(&left, &right, powers))
}

/// Order two decoded decimals by value
#[must_use]
pub fn compare_decoded(
    left: &EncodedDecimal<'_>,
    right: &EncodedDecimal<'_>,
    powers: &PowerOfTenCache,
) -> Ordering {
    let (
        EncodedDecimal::Value {
            exponent: a_exp,
            significand: a_sig,
            ..
        },
        EncodedDecimal::Value {
            exponent: b_exp,
            significand: b_sig,
            ..
        },
    ) = (left, right)
    else {
        return (!left.is_null()).cmp(&!right.is_null());
    };

    let sign = left.signum();
    match sign.cmp(&right.signum()) {
        Ordering::Equal if sign == 0 => return Ordering::Equal,
        Ordering::Equal => {}
        unequal => return unequal,
    }

    let magnitude = compare_magnitudes(*a_sig, *a_exp, *b_sig, *b_exp, powers);
    if sign < 0 {
        magnitude.reverse()
    } else {
        magnitude
    }
}

fn compare_magnitudes(
    a: Significand<'_>,
    a_exp: i32,
    b: Significand<'_>,
    b_exp: i32,
    powers: &PowerOfTenCache,
) -> Ordering {
    match (a.narrowed(), b.narrowed()) {
        (Significand::Compact(a), Significand::Compact(b)) => {
            compare_decimal_compact(a, a_exp, b, b_exp)
        }
        (Significand::Extended(a), Significand::Compact(b)) => {
            compare_decimal_mp_compact(a, a_exp, b, b_exp, powers)
        }
        (Significand::Compact(a), Significand::Extended(b)) => {
            compare_decimal_mp_compact(b, b_exp, a, a_exp, powers).reverse()
        }
        (Significand::Extended(a), Significand::Extended(b)) => {
            compare_decimal_mp(a, a_exp, b, b_exp, powers)
        }
    }
}
