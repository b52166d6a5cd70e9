//! Error types for parsing fittrack data.

use thiserror::Error;

/// Errors that can occur when parsing string-encoded fittrack values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Gender string was neither "male" nor "female".
    #[error("Unknown gender: {0}")]
    UnknownGender(String),

    /// Weight unit string was neither "kg" nor "lbs".
    #[error("Unknown weight unit: {0}")]
    UnknownWeightUnit(String),
}

/// Result type alias using fittrack-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
