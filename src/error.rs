use thiserror::Error;

/// Errors that can occur while reading encoded key values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unexpected end of input while decoding")]
    UnexpectedEndOfInput,

    #[error("Buffer too short: need {expected} bytes, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Invalid presence flag: {0:#04x}")]
    InvalidPresence(u8),

    #[error("Invalid length: {0}")]
    InvalidLength(i64),

    #[error("Negative unscaled value in compact decimal: {0}")]
    NegativeUnscaled(i64),

    #[error("Decimal scale {0} does not fit a 32-bit exponent")]
    ScaleOutOfRange(i64),
}

/// Errors raised while building comparators or loading their configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Comparator `{0}` is already registered")]
    DuplicateComparator(String),

    #[error("Comparator `{0}` is not registered")]
    UnknownComparator(String),

    #[error("Key comparator `{0}` has no fields")]
    EmptyKey(String),

    #[error("Power-of-ten prefill {requested} exceeds the maximum of {max}")]
    PrefillTooLarge { requested: u32, max: u32 },

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for decoding operations
pub type DecodeResult<T> = Result<T, DecodeError>;
