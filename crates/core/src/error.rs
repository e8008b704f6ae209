//! Error types for the colorfix core.
//!
//! The numeric operations (conversion, distance, search) are total and never
//! fail. Errors only arise at the boundary: parsing colors and validating
//! search parameters.

use thiserror::Error;

/// Errors produced while parsing colors or building search parameters.
#[derive(Debug, Error)]
pub enum ColorError {
    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Search parameters were rejected by validation.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}
