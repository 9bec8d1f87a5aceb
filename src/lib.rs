//! # deccmp
//!
//! Comparators for sort keys whose fields are serialized arbitrary-precision
//! decimals and other typed values, meant to be called as the value-comparison
//! callback of a sort-based shuffle.
//!
//! Decimals are compared directly from their encoded bytes:
//!
//! - **No decoding into a bignum on the hot path**: values whose significand
//!   fits in 64 bits are aligned with one division and never allocate
//! - **Bounded fallback**: large values are first ordered by a bit-length bound
//!   on `significand × 10^gap`; the exact product is only computed when the
//!   bound cannot decide
//! - **Shared power-of-ten cache**: `10^n` for large `n` is computed once and
//!   shared by every comparator behind an [`Arc`](std::sync::Arc)
//!
//! ## Examples
//!
//! ```rust
//! use deccmp::{ByteReader, PowerOfTenCache, compare_encoded_decimal, encode_decimal};
//! use std::cmp::Ordering;
//!
//! let powers = PowerOfTenCache::new();
//!
//! // 1.50 and 1.5 encode differently but are the same number
//! let a = encode_decimal(true, &[150], -2);
//! let b = encode_decimal(true, &[15], -1);
//!
//! let order = compare_encoded_decimal(
//!     &mut ByteReader::new(&a),
//!     &mut ByteReader::new(&b),
//!     &powers,
//! )
//! .unwrap();
//! assert_eq!(order, Ordering::Equal);
//! ```
//!
//! Composite keys are compared through a [`ComparatorRegistry`]:
//!
//! ```rust
//! use deccmp::{ByteWriter, ComparatorRegistry, FieldOrdering, ValueType};
//! use deccmp::encoder::{write_decimal_i128, write_string};
//!
//! let mut registry = ComparatorRegistry::with_builtins();
//! registry
//!     .register_key(
//!         "by_amount",
//!         vec![
//!             FieldOrdering::descending(ValueType::Decimal),
//!             FieldOrdering::ascending(ValueType::String),
//!         ],
//!     )
//!     .unwrap();
//!
//! let key = |amount: i128, name: &str| {
//!     let mut writer = ByteWriter::new();
//!     write_decimal_i128(&mut writer, amount, -2);
//!     write_string(&mut writer, name);
//!     writer.into_bytes()
//! };
//!
//! let by_amount = registry.resolve("by_amount").unwrap();
//! assert!(by_amount.less(&key(999, "b"), &key(100, "a")).unwrap());
//! ```

pub(crate) mod config;
pub(crate) mod decimal;
pub(crate) mod decoder;
pub mod encoder;
pub(crate) mod error;
pub(crate) mod key;
pub(crate) mod mpint;
pub(crate) mod power;
pub(crate) mod registry;
pub(crate) mod value;
pub(crate) mod varint;

pub use config::{MAX_POWER_OF_TEN_PREFILL, RegistryConfig};
pub use decimal::{
    CompactDecimal, DecimalValue, MpDecimal, compare_decimal_compact, compare_decimal_mp,
    compare_decimal_mp_compact,
};
pub use decoder::{
    DECIMAL_COMPACT_MASK, DECIMAL_NULL, DECIMAL_PLUS_MASK, DECIMAL_PRESENT, EncodedDecimal,
    Significand, compare_decoded, compare_encoded_decimal, read_decimal, skip_decimal,
};
pub use encoder::encode_decimal;
pub use error::{ConfigError, DecodeError, DecodeResult};
pub use key::{Direction, FieldOrdering, KeyComparator};
pub use mpint::MpInt;
pub use power::{COMPACT_POWERS_OF_TEN, MAX_COMPACT_EXPONENT, PowerOfTenCache};
pub use registry::{Comparator, ComparatorRegistry, NativeLess, to_indicator};
pub use value::ValueType;
pub use varint::{ByteReader, ByteWriter, compact_int_size};
