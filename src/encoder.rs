//! Producer side of the key format.
//!
//! Shuffle keys are written by the serializer that pairs with the comparators
//! in this crate; these writers emit the same layout and are used by tests,
//! benchmarks and callers that build keys themselves.

use crate::decoder::{DECIMAL_COMPACT_MASK, DECIMAL_NULL, DECIMAL_PLUS_MASK, DECIMAL_PRESENT};
use crate::varint::ByteWriter;

/// Presence byte of a null primitive field
pub const FIELD_NULL: u8 = 0;
/// Presence byte of a non-null primitive field
pub const FIELD_PRESENT: u8 = 1;
/// Length written for a null string
pub const STRING_NULL_LENGTH: i64 = -1;

pub fn write_null_decimal(writer: &mut ByteWriter) {
    writer.write_u8(DECIMAL_NULL);
}

/// Write `±magnitude × 10^exponent`, using the compact form when the
/// magnitude fits in 63 bits.
///
/// `magnitude` is unsigned big-endian; leading zero bytes are ignored.
pub fn write_decimal(writer: &mut ByteWriter, positive: bool, magnitude: &[u8], exponent: i32) {
    let magnitude = strip_leading_zeros(magnitude);
    match compact_value(magnitude) {
        Some(value) => {
            writer.write_u8(header(positive) | DECIMAL_COMPACT_MASK);
            writer.write_compact_int(-i64::from(exponent));
            writer.write_compact_int(value);
        }
        None => write_decimal_extended(writer, positive, magnitude, exponent),
    }
}

/// Write a decimal in extended form regardless of its magnitude
#[allow(clippy::cast_possible_wrap)]
pub fn write_decimal_extended(
    writer: &mut ByteWriter,
    positive: bool,
    magnitude: &[u8],
    exponent: i32,
) {
    let magnitude = strip_leading_zeros(magnitude);
    writer.write_u8(header(positive));
    writer.write_compact_int(-i64::from(exponent));
    writer.write_compact_int(magnitude.len() as i64);
    writer.write_bytes(magnitude);
}

/// Write a signed unscaled value; zero is written as positive
pub fn write_decimal_i128(writer: &mut ByteWriter, unscaled: i128, exponent: i32) {
    write_decimal(
        writer,
        unscaled >= 0,
        &unscaled.unsigned_abs().to_be_bytes(),
        exponent,
    );
}

/// Encode a single decimal into a fresh buffer
#[must_use]
pub fn encode_decimal(positive: bool, magnitude: &[u8], exponent: i32) -> Vec<u8> {
    let mut writer = ByteWriter::with_capacity(magnitude.len() + 3);
    write_decimal(&mut writer, positive, magnitude, exponent);
    writer.into_bytes()
}

const fn header(positive: bool) -> u8 {
    if positive {
        DECIMAL_PRESENT | DECIMAL_PLUS_MASK
    } else {
        DECIMAL_PRESENT
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

fn compact_value(magnitude: &[u8]) -> Option<i64> {
    if magnitude.len() > 8 {
        return None;
    }
    let mut buf = [0u8; 8];
    buf[8 - magnitude.len()..].copy_from_slice(magnitude);
    i64::try_from(u64::from_be_bytes(buf)).ok()
}

pub fn write_null_field(writer: &mut ByteWriter) {
    writer.write_u8(FIELD_NULL);
}

pub fn write_bool(writer: &mut ByteWriter, value: bool) {
    writer.write_u8(FIELD_PRESENT);
    writer.write_u8(u8::from(value));
}

pub fn write_i8(writer: &mut ByteWriter, value: i8) {
    writer.write_u8(FIELD_PRESENT);
    writer.write_bytes(&value.to_be_bytes());
}

pub fn write_i16(writer: &mut ByteWriter, value: i16) {
    writer.write_u8(FIELD_PRESENT);
    writer.write_bytes(&value.to_be_bytes());
}

pub fn write_i32(writer: &mut ByteWriter, value: i32) {
    writer.write_u8(FIELD_PRESENT);
    writer.write_bytes(&value.to_be_bytes());
}

pub fn write_i64(writer: &mut ByteWriter, value: i64) {
    writer.write_u8(FIELD_PRESENT);
    writer.write_bytes(&value.to_be_bytes());
}

pub fn write_f32(writer: &mut ByteWriter, value: f32) {
    writer.write_u8(FIELD_PRESENT);
    writer.write_bytes(&value.to_bits().to_be_bytes());
}

pub fn write_f64(writer: &mut ByteWriter, value: f64) {
    writer.write_u8(FIELD_PRESENT);
    writer.write_bytes(&value.to_bits().to_be_bytes());
}

/// Days since the epoch
pub fn write_date(writer: &mut ByteWriter, days: i32) {
    write_i32(writer, days);
}

/// Seconds since the epoch
pub fn write_date_time(writer: &mut ByteWriter, seconds: i64) {
    write_i64(writer, seconds);
}

#[allow(clippy::cast_possible_wrap)]
pub fn write_string(writer: &mut ByteWriter, value: &str) {
    writer.write_compact_int(value.len() as i64);
    writer.write_bytes(value.as_bytes());
}

pub fn write_null_string(writer: &mut ByteWriter) {
    writer.write_compact_int(STRING_NULL_LENGTH);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(f: impl FnOnce(&mut ByteWriter)) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        f(&mut writer);
        writer.into_bytes()
    }

    #[test]
    fn test_compact_decimal_layout() {
        // -12.5 = -(125 × 10^-1)
        assert_eq!(encode_decimal(false, &[125], -1), vec![0x81, 0x01, 0x7d]);
        assert_eq!(encode_decimal(true, &[0, 0, 7], 3), vec![0x83, 0xfd, 0x07]);
    }

    #[test]
    fn test_zero_decimal() {
        assert_eq!(encode_decimal(true, &[], 0), vec![0x83, 0x00, 0x00]);
        assert_eq!(bytes(|w| write_decimal_i128(w, 0, 2)), vec![0x83, 0xfe, 0x00]);
    }

    #[test]
    fn test_extended_when_over_63_bits() {
        let top_bit = 1u64 << 63;
        let encoded = encode_decimal(true, &top_bit.to_be_bytes(), 0);
        assert_eq!(encoded[0], DECIMAL_PRESENT | DECIMAL_PLUS_MASK);
        assert_eq!(&encoded[1..3], &[0x00, 0x08]);
        assert_eq!(&encoded[3..], &top_bit.to_be_bytes());

        let fits = encode_decimal(true, &i64::MAX.to_be_bytes(), 0);
        assert_eq!(fits[0] & DECIMAL_COMPACT_MASK, DECIMAL_COMPACT_MASK);
    }

    #[test]
    fn test_forced_extended() {
        let encoded = bytes(|w| write_decimal_extended(w, false, &[0, 5], -2));
        assert_eq!(encoded, vec![DECIMAL_PRESENT, 0x02, 0x01, 0x05]);
    }

    #[test]
    fn test_i128_sign() {
        let negative = bytes(|w| write_decimal_i128(w, -3, 0));
        assert_eq!(negative, vec![DECIMAL_PRESENT | DECIMAL_COMPACT_MASK, 0x00, 0x03]);
        let huge = bytes(|w| write_decimal_i128(w, i128::MIN, 0));
        assert_eq!(huge[0], DECIMAL_PRESENT);
        assert_eq!(huge[2], 16);
    }

    #[test]
    fn test_primitive_layouts() {
        assert_eq!(bytes(|w| write_i32(w, -2)), vec![1, 0xff, 0xff, 0xff, 0xfe]);
        assert_eq!(bytes(|w| write_bool(w, true)), vec![1, 1]);
        assert_eq!(bytes(write_null_field), vec![0]);
        assert_eq!(bytes(|w| write_f32(w, 1.0)), vec![1, 0x3f, 0x80, 0x00, 0x00]);
        assert_eq!(bytes(|w| write_string(w, "ab")), vec![2, b'a', b'b']);
        assert_eq!(bytes(write_null_string), vec![0xff]);
    }
}
