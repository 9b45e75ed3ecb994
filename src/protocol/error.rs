//! Protocol error types

use thiserror::Error;

/// Errors raised by the message core and its persistence helpers.
///
/// Per-field validation problems are not errors; they are reported through
/// [`ValidationReport`](super::ValidationReport).
#[derive(Error, Debug)]
pub enum Error {
    /// Field number outside the registry
    #[error("unknown field: {number}")]
    UnknownField {
        /// Requested field number
        number: u8,
    },

    /// Field 1 is derived from the selection and cannot be set
    #[error("field {number} is reserved for the secondary bitmap indicator")]
    ReservedField {
        /// Requested field number
        number: u8,
    },

    /// Variable-length value does not fit its length prefix
    #[error("field {number}: {len} characters exceed the {max}-character length prefix")]
    EncodingOverflow {
        /// Field number
        number: u8,
        /// Value length
        len: usize,
        /// Largest encodable length
        max: usize,
    },

    /// Message too long for the 2-byte length header
    #[error("frame too long: {bytes} bytes (max {max})")]
    FrameTooLong {
        /// Byte count the header would carry
        bytes: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Malformed template content
    #[error("invalid template: {0}")]
    Template(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
