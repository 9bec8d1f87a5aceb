//! Memoized powers of ten.
//!
//! The cache is append-only: entries live in segments that are allocated once
//! and never move, so a `&MpInt` handed out by [`PowerOfTenCache::get`] stays
//! valid for the lifetime of the cache. Reads of populated entries take no
//! lock; growth is serialized by a single mutex.

use crate::mpint::MpInt;
use log::debug;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock, PoisonError};

/// 10^0 through 10^19, every power of ten that fits in 64 bits
pub const COMPACT_POWERS_OF_TEN: [u64; 20] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
    10_000_000_000_000_000_000,
];

/// Largest exponent whose power of ten fits in a `u64`
#[allow(clippy::cast_possible_truncation)]
pub const MAX_COMPACT_EXPONENT: u32 = COMPACT_POWERS_OF_TEN.len() as u32 - 1;

// Segment k holds 2^(k + FIRST_SEGMENT_BITS) entries; together they cover
// every u32 exponent.
const FIRST_SEGMENT_BITS: u32 = 6;
const SEGMENTS: usize = 33 - FIRST_SEGMENT_BITS as usize;

type Segment = Box<[OnceLock<MpInt>]>;

/// Process-lifetime table of `10^n` values, shared by reference between
/// comparators (typically behind an `Arc`).
pub struct PowerOfTenCache {
    segments: [OnceLock<Segment>; SEGMENTS],
    populated: AtomicUsize,
    extend: Mutex<()>,
}

impl PowerOfTenCache {
    /// Create a cache seeded with the 64-bit powers of ten
    #[must_use]
    pub fn new() -> Self {
        let cache = Self {
            segments: std::array::from_fn(|_| OnceLock::new()),
            populated: AtomicUsize::new(0),
            extend: Mutex::new(()),
        };
        for (index, &power) in COMPACT_POWERS_OF_TEN.iter().enumerate() {
            cache.slot(index).get_or_init(|| MpInt::from_u64(power));
        }
        cache
            .populated
            .store(COMPACT_POWERS_OF_TEN.len(), Ordering::Release);
        cache
    }

    /// Create a cache already extended up to `10^max_exponent`
    #[must_use]
    pub fn with_prefill(max_exponent: u32) -> Self {
        let cache = Self::new();
        let _ = cache.get(max_exponent);
        cache
    }

    /// Number of populated entries (`10^0..10^(len-1)`)
    #[must_use]
    pub fn len(&self) -> usize {
        self.populated.load(Ordering::Acquire)
    }

    /// Always false: the cache is seeded on construction
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `10^exponent`, extending the table if needed
    #[must_use]
    pub fn get(&self, exponent: u32) -> &MpInt {
        let index = exponent as usize;
        match self.lookup(index) {
            Some(value) => value,
            None => self.extend_to(index),
        }
    }

    /// Minimal big-endian bytes of `10^exponent`
    #[must_use]
    pub fn bytes(&self, exponent: u32) -> Vec<u8> {
        self.get(exponent).to_be_bytes()
    }

    fn lookup(&self, index: usize) -> Option<&MpInt> {
        let (segment, offset) = locate(index);
        self.segments.get(segment)?.get()?.get(offset)?.get()
    }

    fn slot(&self, index: usize) -> &OnceLock<MpInt> {
        let (segment, offset) = locate(index);
        &self.segments[segment].get_or_init(|| {
            (0..segment_len(segment))
                .map(|_| OnceLock::new())
                .collect()
        })[offset]
    }

    fn extend_to(&self, index: usize) -> &MpInt {
        let _guard = self.extend.lock().unwrap_or_else(PoisonError::into_inner);
        // another thread may have grown the table while we waited
        if let Some(value) = self.lookup(index) {
            return value;
        }

        let populated = self.populated.load(Ordering::Acquire);
        debug!("extending power-of-ten cache from {populated} to {} entries", index + 1);
        let mut value = self
            .lookup(populated - 1)
            .expect("populated power-of-ten entries are initialized");
        for i in populated..=index {
            value = self.slot(i).get_or_init(|| value.mul_u32(10));
        }
        self.populated.store(index + 1, Ordering::Release);
        value
    }
}

impl Default for PowerOfTenCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PowerOfTenCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PowerOfTenCache")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn locate(index: usize) -> (usize, usize) {
    let shifted = index as u64 + (1 << FIRST_SEGMENT_BITS);
    let top = 63 - shifted.leading_zeros();
    let segment = (top - FIRST_SEGMENT_BITS) as usize;
    let offset = (shifted - (1 << top)) as usize;
    (segment, offset)
}

const fn segment_len(segment: usize) -> usize {
    1 << (segment + FIRST_SEGMENT_BITS as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_locate_segments() {
        assert_eq!(locate(0), (0, 0));
        assert_eq!(locate(63), (0, 63));
        assert_eq!(locate(64), (1, 0));
        assert_eq!(locate(191), (1, 127));
        assert_eq!(locate(192), (2, 0));
        let (segment, offset) = locate(u32::MAX as usize);
        assert!(segment < SEGMENTS);
        assert!(offset < segment_len(segment));
    }

    #[test]
    fn test_seeded_powers() {
        let cache = PowerOfTenCache::new();
        assert_eq!(cache.len(), 20);
        for (exponent, &power) in COMPACT_POWERS_OF_TEN.iter().enumerate() {
            assert_eq!(cache.get(exponent as u32).to_u64(), Some(power));
        }
        assert_eq!(cache.len(), 20);
    }

    #[test]
    fn test_extension_matches_previous_times_ten() {
        let cache = PowerOfTenCache::new();
        for exponent in 1..=100 {
            let expected = cache.get(exponent - 1).mul_u32(10);
            assert_eq!(cache.get(exponent), &expected, "10^{exponent}");
        }
        assert_eq!(cache.len(), 101);
    }

    #[test]
    fn test_references_survive_growth() {
        let cache = PowerOfTenCache::new();
        let early = cache.get(30);
        let early_ptr: *const MpInt = early;
        let _ = cache.get(1_000);
        assert!(std::ptr::eq(early_ptr, cache.get(30)));
        assert_eq!(early.bits(), cache.get(30).bits());
    }

    #[test]
    fn test_bytes_of_ten_pow_20() {
        let cache = PowerOfTenCache::new();
        // 10^20 = 0x05_6BC7_5E2D_6310_0000
        assert_eq!(
            cache.bytes(20),
            vec![0x05, 0x6b, 0xc7, 0x5e, 0x2d, 0x63, 0x10, 0x00, 0x00]
        );
        assert_eq!(cache.bytes(0), vec![1]);
    }

    #[test]
    fn test_concurrent_extension() {
        let cache = Arc::new(PowerOfTenCache::new());
        let handles: Vec<_> = (0..8u32)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get(200 + t * 10).bits())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap() > 0);
        }
        assert_eq!(cache.len(), 271);
        let reference = PowerOfTenCache::new();
        assert_eq!(cache.get(270), reference.get(270));
    }
}
