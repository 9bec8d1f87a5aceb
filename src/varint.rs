//! Byte cursors and the zero-compressed "compact int" codec.
//!
//! A compact int is a signed 64-bit value stored in 1 to 9 bytes:
//!
//! | value                | layout                                                   |
//! |----------------------|----------------------------------------------------------|
//! | `-112..=127`         | one byte, the value itself                               |
//! | other, non-negative  | head `-112 - n`, then `v` as `n` big-endian bytes        |
//! | other, negative      | head `-120 - n`, then `!v` as `n` big-endian bytes       |
//!
//! so the total size is known from the head byte alone.

use crate::error::DecodeError;
use crate::error::DecodeResult;

/// Total encoded size of a compact int, given its first byte
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn compact_int_size(head: i8) -> usize {
    if head >= -112 {
        1
    } else if head < -120 {
        (-119 - head as i32) as usize
    } else {
        (-111 - head as i32) as usize
    }
}

const fn is_negative_compact_int(head: i8) -> bool {
    head < -120 || (head >= -112 && head < 0)
}

/// Forward-only cursor over an encoded buffer
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        ByteReader { bytes, pos: 0 }
    }

    /// Read a single byte
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEndOfInput`] if the buffer is exhausted.
    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or(DecodeError::UnexpectedEndOfInput)?;
        self.pos += 1;
        Ok(byte)
    }

    /// Read a single byte as a signed value
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEndOfInput`] if the buffer is exhausted.
    #[allow(clippy::cast_possible_wrap)]
    pub fn read_i8(&mut self) -> DecodeResult<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Borrow the next `len` bytes and advance past them
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::BufferTooShort`] if fewer than `len` bytes remain.
    pub fn read_bytes(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let available = self.remaining();
        if len > available {
            return Err(DecodeError::BufferTooShort {
                expected: len,
                actual: available,
            });
        }
        let bytes = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    /// Read exactly `N` bytes into an array
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::BufferTooShort`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    /// Read one compact int
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEndOfInput`] if the head byte is
    /// missing, or [`DecodeError::BufferTooShort`] if the payload is truncated.
    pub fn read_compact_int(&mut self) -> DecodeResult<i64> {
        let head = self.read_i8()?;
        let size = compact_int_size(head);
        if size == 1 {
            return Ok(i64::from(head));
        }
        let payload = self.read_bytes(size - 1)?;
        let value = payload
            .iter()
            .fold(0i64, |acc, &b| (acc << 8) | i64::from(b));
        Ok(if is_negative_compact_int(head) {
            !value
        } else {
            value
        })
    }

    /// Advance past `len` bytes without looking at them
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::BufferTooShort`] if fewer than `len` bytes remain.
    pub fn skip(&mut self, len: usize) -> DecodeResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Offset of the next unread byte
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    /// Unread part of the buffer
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

/// Growable output buffer for encoded values
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(16)
    }

    #[must_use]
    pub fn with_capacity(byte_capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(byte_capacity),
        }
    }

    pub fn write_u8(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Append `value` using the minimal compact-int form
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn write_compact_int(&mut self, value: i64) {
        if (-112..=127).contains(&value) {
            self.bytes.push(value as u8);
            return;
        }
        let (payload, base) = if value < 0 { (!value, -120) } else { (value, -112) };
        // payload is non-negative here, so it needs 1..=8 bytes
        let len = 8 - payload.leading_zeros() as usize / 8;
        self.bytes.push((base - len as i64) as u8);
        self.bytes
            .extend_from_slice(&payload.to_be_bytes()[8 - len..]);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
