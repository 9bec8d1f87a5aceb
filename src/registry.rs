//! Named comparators handed to the shuffle engine.
//!
//! The engine refers to comparators by name. Natively implemented "less"
//! functions and typed key comparators live in the same table, and every key
//! comparator built by a registry shares its power-of-ten cache.

use crate::config::{MAX_POWER_OF_TEN_PREFILL, RegistryConfig};
use crate::error::{ConfigError, DecodeResult};
use crate::key::{FieldOrdering, KeyComparator};
use crate::power::PowerOfTenCache;
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

/// "a sorts before b" over two raw keys
pub type NativeLess = fn(&[u8], &[u8]) -> bool;

#[derive(Debug, Clone)]
pub enum Comparator {
    Native(NativeLess),
    Key(KeyComparator),
}

impl Comparator {
    /// Three-way comparison
    ///
    /// # Errors
    ///
    /// Key comparators return [`DecodeError`](crate::DecodeError) on malformed
    /// keys; native comparators never fail.
    pub fn compare(&self, a: &[u8], b: &[u8]) -> DecodeResult<Ordering> {
        match self {
            Self::Native(less) => Ok(if less(a, b) {
                Ordering::Less
            } else if less(b, a) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }),
            Self::Key(key) => key.compare(a, b),
        }
    }

    /// Whether `a` sorts strictly before `b`
    ///
    /// # Errors
    ///
    /// Same as [`compare`](Self::compare).
    pub fn less(&self, a: &[u8], b: &[u8]) -> DecodeResult<bool> {
        match self {
            Self::Native(less) => Ok(less(a, b)),
            Self::Key(key) => key.less(a, b),
        }
    }
}

/// Map an ordering to the negative/zero/positive integer convention
#[must_use]
pub const fn to_indicator(order: Ordering) -> i32 {
    order as i32
}

/// Name to comparator table
#[derive(Debug, Clone)]
pub struct ComparatorRegistry {
    comparators: BTreeMap<String, Comparator>,
    powers: Arc<PowerOfTenCache>,
}

impl ComparatorRegistry {
    /// Empty registry with its own power-of-ten cache
    #[must_use]
    pub fn new() -> Self {
        Self::with_powers(Arc::new(PowerOfTenCache::new()))
    }

    /// Empty registry sharing an existing cache
    #[must_use]
    pub const fn with_powers(powers: Arc<PowerOfTenCache>) -> Self {
        Self {
            comparators: BTreeMap::new(),
            powers,
        }
    }

    /// Registry holding `lt_int32`, `lt_int64` and `lt_bytes`
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert_builtins();
        registry
    }

    fn insert_builtins(&mut self) {
        for (name, less) in BUILTINS {
            self.comparators
                .insert((*name).to_string(), Comparator::Native(*less));
        }
    }

    /// Register a native comparator
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateComparator`] if `name` is taken.
    pub fn register_native(&mut self, name: &str, less: NativeLess) -> Result<(), ConfigError> {
        self.insert(name, Comparator::Native(less))
    }

    /// Register a key comparator over `fields`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyKey`] if `fields` is empty, or
    /// [`ConfigError::DuplicateComparator`] if `name` is taken.
    pub fn register_key(
        &mut self,
        name: &str,
        fields: Vec<FieldOrdering>,
    ) -> Result<(), ConfigError> {
        if fields.is_empty() {
            return Err(ConfigError::EmptyKey(name.to_string()));
        }
        let key = KeyComparator::new(fields, Arc::clone(&self.powers));
        self.insert(name, Comparator::Key(key))
    }

    fn insert(&mut self, name: &str, comparator: Comparator) -> Result<(), ConfigError> {
        if self.comparators.contains_key(name) {
            return Err(ConfigError::DuplicateComparator(name.to_string()));
        }
        debug!("registering comparator `{name}`");
        self.comparators.insert(name.to_string(), comparator);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Comparator> {
        self.comparators.get(name)
    }

    /// Look up a comparator the engine asked for by name
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownComparator`] if nothing is registered
    /// under `name`.
    pub fn resolve(&self, name: &str) -> Result<&Comparator, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownComparator(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.comparators.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    #[must_use]
    pub const fn powers(&self) -> &Arc<PowerOfTenCache> {
        &self.powers
    }

    /// Big-endian bytes of `10^exponent` from the shared cache
    #[must_use]
    pub fn power_of_ten_bytes(&self, exponent: u32) -> Vec<u8> {
        self.powers.bytes(exponent)
    }

    /// Build a registry from its configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the prefill exceeds
    /// [`MAX_POWER_OF_TEN_PREFILL`], a key comparator is empty, or a name is
    /// registered twice.
    pub fn from_config(config: &RegistryConfig) -> Result<Self, ConfigError> {
        if config.power_of_ten_prefill > MAX_POWER_OF_TEN_PREFILL {
            return Err(ConfigError::PrefillTooLarge {
                requested: config.power_of_ten_prefill,
                max: MAX_POWER_OF_TEN_PREFILL,
            });
        }
        let powers = Arc::new(PowerOfTenCache::with_prefill(config.power_of_ten_prefill));
        let mut registry = Self::with_powers(powers);
        if config.include_builtins {
            registry.insert_builtins();
        }
        for (name, fields) in &config.comparators {
            registry.register_key(name, fields.clone())?;
        }
        Ok(registry)
    }
}

impl Default for ComparatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

const BUILTINS: &[(&str, NativeLess)] = &[
    ("lt_int32", lt_int32),
    ("lt_int64", lt_int64),
    ("lt_bytes", lt_bytes),
];

// Keys shorter than the integer width sort first.

fn lt_int32(a: &[u8], b: &[u8]) -> bool {
    let read = |bytes: &[u8]| bytes.first_chunk::<4>().map(|b| i32::from_ne_bytes(*b));
    read(a) < read(b)
}

fn lt_int64(a: &[u8], b: &[u8]) -> bool {
    let read = |bytes: &[u8]| bytes.first_chunk::<8>().map(|b| i64::from_ne_bytes(*b));
    read(a) < read(b)
}

fn lt_bytes(a: &[u8], b: &[u8]) -> bool {
    a < b
}
