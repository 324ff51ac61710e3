use thiserror::Error;

/// Errors that can occur when decoding a tile coordinate key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileCoordError {
    /// Key does not have exactly three `/`-separated segments
    #[error("Invalid tile key '{key}': expected 3 segments (z/x/y), got {found}")]
    WrongSegmentCount { key: String, found: usize },

    /// A segment is not a base-10 integer in range
    #[error("Invalid tile key '{key}': segment '{segment}' is not a valid {axis} value")]
    InvalidSegment {
        key: String,
        segment: String,
        axis: &'static str,
    },
}

/// Errors reported by the host text-layout engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// The layout engine (or its measurement surface) cannot be created
    #[error("Text layout engine unavailable: {0}")]
    Unavailable(String),

    /// A single measurement call failed
    #[error("Text measurement failed for font '{font}': {message}")]
    Failed { font: String, message: String },
}

/// Errors in label or font monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A setting is out of range
    #[error("Invalid label configuration: {0}")]
    Invalid(String),
}
