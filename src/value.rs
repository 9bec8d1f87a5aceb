//! Per-type comparison of encoded key fields.
//!
//! Every comparison consumes exactly one value from each cursor, and NULL
//! sorts before any present value for every type.

use crate::decoder::{compare_encoded_decimal, skip_decimal};
use crate::encoder::{STRING_NULL_LENGTH, write_null_decimal, write_null_field, write_null_string};
use crate::error::{DecodeError, DecodeResult};
use crate::power::PowerOfTenCache;
use crate::varint::{ByteReader, ByteWriter};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Type of one field in a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Date,
    DateTime,
    String,
    Decimal,
}

impl ValueType {
    pub const ALL: [Self; 11] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::Date,
        Self::DateTime,
        Self::String,
        Self::Decimal,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::String => "string",
            Self::Decimal => "decimal",
        }
    }

    /// Compare the values at both cursors, advancing each past its value
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if either value is truncated or malformed.
    pub fn compare(
        self,
        a: &mut ByteReader<'_>,
        b: &mut ByteReader<'_>,
        powers: &PowerOfTenCache,
    ) -> DecodeResult<Ordering> {
        Ok(match self {
            Self::Boolean => read_fixed::<1>(a)?.cmp(&read_fixed::<1>(b)?),
            Self::Byte => compare_fixed(a, b, i8::from_be_bytes)?,
            Self::Short => compare_fixed(a, b, i16::from_be_bytes)?,
            Self::Int | Self::Date => compare_fixed(a, b, i32::from_be_bytes)?,
            Self::Long | Self::DateTime => compare_fixed(a, b, i64::from_be_bytes)?,
            Self::Float => {
                let left = read_fixed(a)?.map(|bits| f64::from(f32::from_be_bytes(bits)));
                let right = read_fixed(b)?.map(|bits| f64::from(f32::from_be_bytes(bits)));
                compare_floats(left, right)
            }
            Self::Double => {
                let left = read_fixed(a)?.map(f64::from_be_bytes);
                let right = read_fixed(b)?.map(f64::from_be_bytes);
                compare_floats(left, right)
            }
            Self::String => read_string(a)?.cmp(&read_string(b)?),
            Self::Decimal => compare_encoded_decimal(a, b, powers)?,
        })
    }

    /// Advance past one value
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the value is truncated or malformed.
    pub fn skip(self, reader: &mut ByteReader<'_>) -> DecodeResult<()> {
        match self {
            Self::Boolean | Self::Byte => read_fixed::<1>(reader).map(|_| ()),
            Self::Short => read_fixed::<2>(reader).map(|_| ()),
            Self::Int | Self::Date | Self::Float => read_fixed::<4>(reader).map(|_| ()),
            Self::Long | Self::DateTime | Self::Double => read_fixed::<8>(reader).map(|_| ()),
            Self::String => read_string(reader).map(|_| ()),
            Self::Decimal => skip_decimal(reader),
        }
    }

    /// Write the NULL encoding of this type
    pub fn write_null(self, writer: &mut ByteWriter) {
        match self {
            Self::String => write_null_string(writer),
            Self::Decimal => write_null_decimal(writer),
            _ => write_null_field(writer),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Presence byte followed by `N` payload bytes; `None` for NULL
fn read_fixed<const N: usize>(reader: &mut ByteReader<'_>) -> DecodeResult<Option<[u8; N]>> {
    match reader.read_u8()? {
        0 => Ok(None),
        1 => reader.read_array().map(Some),
        other => Err(DecodeError::InvalidPresence(other)),
    }
}

fn compare_fixed<const N: usize, T: Ord>(
    a: &mut ByteReader<'_>,
    b: &mut ByteReader<'_>,
    decode: fn([u8; N]) -> T,
) -> DecodeResult<Ordering> {
    let left = read_fixed(a)?.map(decode);
    let right = read_fixed(b)?.map(decode);
    Ok(left.cmp(&right))
}

/// `-0.0 < 0.0`, and every NaN is equal to every other and above `+inf`
fn compare_floats(a: Option<f64>, b: Option<f64>) -> Ordering {
    let canonical = |v: f64| if v.is_nan() { f64::NAN } else { v };
    match (a, b) {
        (Some(a), Some(b)) => canonical(a).total_cmp(&canonical(b)),
        _ => a.is_some().cmp(&b.is_some()),
    }
}

fn read_string<'a>(reader: &mut ByteReader<'a>) -> DecodeResult<Option<&'a [u8]>> {
    let len = reader.read_compact_int()?;
    if len == STRING_NULL_LENGTH {
        return Ok(None);
    }
    let len = usize::try_from(len).map_err(|_| DecodeError::InvalidLength(len))?;
    reader.read_bytes(len).map(Some)
}
