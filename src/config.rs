use crate::error::ConfigError;
use crate::key::FieldOrdering;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Largest accepted `power_of_ten_prefill`. Prefilling keeps every power up
/// to the bound, so the table grows quadratically with it; at this bound it
/// holds about 3.5 MiB. Larger exponents are still computed on demand.
pub const MAX_POWER_OF_TEN_PREFILL: u32 = 4_096;

/// Comparators to register at startup, usually read from a JSON file:
///
/// ```json
/// {
///   "power_of_ten_prefill": 64,
///   "include_builtins": true,
///   "comparators": {
///     "order_by_amount": [
///       { "type": "decimal", "direction": "descending" },
///       { "type": "string" }
///     ]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Powers of ten computed up front, up to `10^power_of_ten_prefill`.
    /// At most [`MAX_POWER_OF_TEN_PREFILL`].
    #[serde(default)]
    pub power_of_ten_prefill: u32,

    #[serde(default = "default_include_builtins")]
    pub include_builtins: bool,

    /// Key comparators by name
    #[serde(default)]
    pub comparators: BTreeMap<String, Vec<FieldOrdering>>,
}

const fn default_include_builtins() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            power_of_ten_prefill: 0,
            include_builtins: default_include_builtins(),
            comparators: BTreeMap::new(),
        }
    }
}

impl RegistryConfig {
    /// Parse a configuration document
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is not valid JSON or has
    /// unknown fields.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if it does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize back to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
