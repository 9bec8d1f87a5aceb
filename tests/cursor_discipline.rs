//! Cursors must land on the first byte of the next record after every
//! comparison, whichever path decided it.

use deccmp::encoder::{write_decimal, write_decimal_extended, write_null_decimal, write_string};
use deccmp::{
    ByteReader, ByteWriter, PowerOfTenCache, ValueType, compare_encoded_decimal, read_decimal,
    skip_decimal,
};
use std::cmp::Ordering;

/// Three consecutive decimals plus the offset where each one starts
fn three_records(write: [fn(&mut ByteWriter); 3]) -> (Vec<u8>, [usize; 4]) {
    let mut writer = ByteWriter::new();
    let mut offsets = [0; 4];
    for (i, f) in write.iter().enumerate() {
        offsets[i] = writer.len();
        f(&mut writer);
    }
    offsets[3] = writer.len();
    (writer.into_bytes(), offsets)
}

#[test]
fn test_read_decimal_positions() {
    let (bytes, offsets) = three_records([
        |w| write_decimal(w, true, &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0], -3),
        write_null_decimal,
        |w| write_decimal(w, false, &[42], 7),
    ]);
    let mut reader = ByteReader::new(&bytes);
    for end in &offsets[1..] {
        read_decimal(&mut reader).unwrap();
        assert_eq!(reader.position(), *end);
    }
    assert_eq!(reader.remaining(), 0);

    let mut reader = ByteReader::new(&bytes);
    for end in &offsets[1..] {
        skip_decimal(&mut reader).unwrap();
        assert_eq!(reader.position(), *end);
    }
}

#[test]
fn test_compare_positions_on_every_path() {
    let powers = PowerOfTenCache::new();
    // decided by sign, by NULL, and by the bit-length bound
    let (left, left_offsets) = three_records([
        |w| write_decimal(w, false, &[5], 0),
        write_null_decimal,
        |w| write_decimal_extended(w, true, &[0x12, 0x34, 0, 0, 0, 0, 0, 0, 0, 0], 40),
    ]);
    let (right, right_offsets) = three_records([
        |w| write_decimal(w, true, &[0xff; 12], -10),
        |w| write_decimal(w, true, &[0], 3),
        |w| write_decimal(w, true, &[0x01, 0x02], 60),
    ]);

    let mut a = ByteReader::new(&left);
    let mut b = ByteReader::new(&right);
    let expected = [Ordering::Less, Ordering::Less, Ordering::Greater];
    for (i, order) in expected.iter().enumerate() {
        assert_eq!(compare_encoded_decimal(&mut a, &mut b, &powers).unwrap(), *order, "record {i}");
        assert_eq!(a.position(), left_offsets[i + 1], "left cursor after record {i}");
        assert_eq!(b.position(), right_offsets[i + 1], "right cursor after record {i}");
    }
}

#[test]
fn test_equal_values_in_different_forms() {
    let powers = PowerOfTenCache::new();
    let (left, left_offsets) = three_records([
        |w| write_decimal(w, true, &[100], 0),
        |w| write_decimal(w, false, &[0], 0),
        |w| write_decimal(w, true, &u128::pow(10, 25).to_be_bytes(), 0),
    ]);
    let (right, right_offsets) = three_records([
        |w| write_decimal_extended(w, true, &[10], 1),
        |w| write_decimal_extended(w, true, &[], -4),
        |w| write_decimal(w, true, &[1], 25),
    ]);

    let mut a = ByteReader::new(&left);
    let mut b = ByteReader::new(&right);
    for i in 0..3 {
        assert_eq!(compare_encoded_decimal(&mut a, &mut b, &powers).unwrap(), Ordering::Equal);
        assert_eq!(a.position(), left_offsets[i + 1]);
        assert_eq!(b.position(), right_offsets[i + 1]);
    }
}

#[test]
fn test_mixed_fields_stay_aligned() {
    let powers = PowerOfTenCache::new();
    let record = |amount: u8, name: &str| {
        let mut writer = ByteWriter::new();
        write_decimal(&mut writer, true, &[amount], -1);
        write_string(&mut writer, name);
        writer.into_bytes()
    };
    let a = record(7, "first");
    let b = record(9, "second-longer");

    let mut ra = ByteReader::new(&a);
    let mut rb = ByteReader::new(&b);
    assert_eq!(
        ValueType::Decimal.compare(&mut ra, &mut rb, &powers).unwrap(),
        Ordering::Less
    );
    assert_eq!(
        ValueType::String.compare(&mut ra, &mut rb, &powers).unwrap(),
        Ordering::Less
    );
    assert_eq!(ra.remaining(), 0);
    assert_eq!(rb.remaining(), 0);
}
