//! Structured error types for font loading and embedding.
//!
//! The first four variants are the structural failures a font binary can
//! produce. Any of them rejects the font outright: there is no partial
//! load. `Io` and `Config` cover the ways a font never reaches the parser.

use thiserror::Error;

/// The unified error type returned by all public embedfont API functions.
#[derive(Debug, Error)]
pub enum FontError {
    /// A version tag or magic number is not one we know how to read.
    #[error("Unsupported {what}: 0x{value:08X}")]
    UnsupportedFormat { what: &'static str, value: u32 },

    /// An internal cross-check failed (rangeShift, loca ordering, ...).
    #[error("Malformed font: {0}")]
    MalformedFont(String),

    /// A required table tag is absent from the table directory.
    #[error("Required font table is missing: '{0}'")]
    MissingTable(String),

    /// A read would run past the end of the font buffer.
    #[error("Truncated font data: need {needed} bytes at offset {offset}, buffer is {len} bytes")]
    TruncatedData {
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// The font file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Font options or a font manifest could not be decoded.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FontError {
    fn from(e: serde_json::Error) -> Self {
        FontError::Config(format!("invalid JSON: {}", e))
    }
}

impl From<base64::DecodeError> for FontError {
    fn from(e: base64::DecodeError) -> Self {
        FontError::Config(format!("invalid base64 font data: {}", e))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FontError>;
