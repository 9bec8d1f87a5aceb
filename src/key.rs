//! Comparators over composite sort keys.

use crate::error::DecodeResult;
use crate::power::PowerOfTenCache;
use crate::value::ValueType;
use crate::varint::ByteReader;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Sort direction of one key field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl Direction {
    #[must_use]
    pub const fn apply(self, order: Ordering) -> Ordering {
        match self {
            Self::Ascending => order,
            Self::Descending => order.reverse(),
        }
    }
}

/// One field of a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldOrdering {
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default)]
    pub direction: Direction,
}

impl FieldOrdering {
    #[must_use]
    pub const fn ascending(value_type: ValueType) -> Self {
        Self {
            value_type,
            direction: Direction::Ascending,
        }
    }

    #[must_use]
    pub const fn descending(value_type: ValueType) -> Self {
        Self {
            value_type,
            direction: Direction::Descending,
        }
    }
}

/// Compares two key buffers holding the same sequence of encoded fields.
///
/// Fields are compared in order and the first unequal one decides. Fields
/// after the deciding one are not read.
#[derive(Debug, Clone)]
pub struct KeyComparator {
    fields: Vec<FieldOrdering>,
    powers: Arc<PowerOfTenCache>,
}

impl KeyComparator {
    #[must_use]
    pub const fn new(fields: Vec<FieldOrdering>, powers: Arc<PowerOfTenCache>) -> Self {
        Self { fields, powers }
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldOrdering] {
        &self.fields
    }

    #[must_use]
    pub fn powers(&self) -> &Arc<PowerOfTenCache> {
        &self.powers
    }

    /// Three-way comparison of two keys
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`](crate::DecodeError) if a field is truncated or
    /// malformed.
    pub fn compare(&self, a: &[u8], b: &[u8]) -> DecodeResult<Ordering> {
        let mut left = ByteReader::new(a);
        let mut right = ByteReader::new(b);
        for field in &self.fields {
            let order = field
                .value_type
                .compare(&mut left, &mut right, &self.powers)?;
            if order != Ordering::Equal {
                return Ok(field.direction.apply(order));
            }
        }
        Ok(Ordering::Equal)
    }

    /// Whether `a` sorts strictly before `b`
    ///
    /// # Errors
    ///
    /// Same as [`compare`](Self::compare).
    pub fn less(&self, a: &[u8], b: &[u8]) -> DecodeResult<bool> {
        self.compare(a, b).map(Ordering::is_lt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{write_decimal_i128, write_i32, write_string};
    use crate::varint::ByteWriter;

    fn key(amount: i128, scale: i32, name: &str) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        write_decimal_i128(&mut writer, amount, -scale);
        write_string(&mut writer, name);
        writer.into_bytes()
    }

    #[test]
    fn test_first_field_decides() {
        let comparator = KeyComparator::new(
            vec![
                FieldOrdering::ascending(ValueType::Decimal),
                FieldOrdering::ascending(ValueType::String),
            ],
            Arc::new(PowerOfTenCache::new()),
        );
        assert_eq!(
            comparator.compare(&key(150, 2, "b"), &key(15, 1, "a")).unwrap(),
            Ordering::Greater
        );
        assert_eq!(
            comparator.compare(&key(150, 2, "a"), &key(15, 1, "b")).unwrap(),
            Ordering::Less
        );
        assert_eq!(
            comparator.compare(&key(-1, 0, "z"), &key(1, 0, "a")).unwrap(),
            Ordering::Less
        );
    }

    #[test]
    fn test_descending_field() {
        let comparator = KeyComparator::new(
            vec![
                FieldOrdering::descending(ValueType::Decimal),
                FieldOrdering::ascending(ValueType::String),
            ],
            Arc::new(PowerOfTenCache::new()),
        );
        assert!(comparator.less(&key(2, 0, "x"), &key(1, 0, "a")).unwrap());
        assert!(comparator.less(&key(1, 0, "a"), &key(1, 0, "b")).unwrap());
        assert!(!comparator.less(&key(1, 0, "a"), &key(10, 1, "a")).unwrap());
    }

    #[test]
    fn test_truncated_key() {
        let comparator = KeyComparator::new(
            vec![FieldOrdering::ascending(ValueType::Int)],
            Arc::new(PowerOfTenCache::new()),
        );
        let mut writer = ByteWriter::new();
        write_i32(&mut writer, 7);
        let full = writer.into_bytes();
        assert!(comparator.compare(&full, &full[..3]).is_err());
    }

    #[test]
    fn test_field_ordering_json() {
        let field: FieldOrdering =
            serde_json::from_str(r#"{ "type": "date_time", "direction": "desc" }"#).unwrap();
        assert_eq!(field, FieldOrdering::descending(ValueType::DateTime));

        let field: FieldOrdering = serde_json::from_str(r#"{ "type": "int" }"#).unwrap();
        assert_eq!(field.direction, Direction::Ascending);

        assert!(serde_json::from_str::<FieldOrdering>(r#"{ "type": "int", "nulls": "last" }"#).is_err());
    }
}
