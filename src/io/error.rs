//! Error types for descriptor extraction, layout optimization, and file output

use std::fmt;
use std::path::PathBuf;

/// Main error type for all quilt operations
#[derive(Debug)]
pub enum QuiltError {
    /// Pixel buffer does not describe a `side × side` RGB or RGBA image
    MalformedInput {
        /// Side length the caller claimed
        side: usize,
        /// Actual buffer length in bytes
        len: usize,
        /// Description of the mismatch
        reason: String,
    },

    /// Tile pool counts do not fill the requested grid exactly
    CapacityMismatch {
        /// Sum of all tile counts in the pool
        available: usize,
        /// Number of grid cells (`rows * cols`)
        required: usize,
    },

    /// Failed to decode a tile image from disk
    DecodeFailure {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image decoding error
        source: image::ImageError,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Grid cell references a tile that is not in the pool
    InvalidTileIndex {
        /// The invalid tile index
        index: usize,
        /// Number of tiles in the pool
        pool_size: usize,
    },

    /// Failed to save the rendered quilt
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// JSON configuration or layout could not be read or written
    Serialization {
        /// Path of the JSON document
        path: PathBuf,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// Caller aborted an optimization run between iterations
    Cancelled {
        /// Iteration at which the abort was observed
        iteration: usize,
    },
}

impl fmt::Display for QuiltError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput { side, len, reason } => {
                write!(
                    f,
                    "Malformed pixel buffer ({len} bytes for side {side}): {reason}"
                )
            }
            Self::CapacityMismatch {
                available,
                required,
            } => {
                write!(
                    f,
                    "Tile counts sum to {available} but the grid has {required} cells"
                )
            }
            Self::DecodeFailure { path, source } => {
                write!(f, "Failed to decode tile '{}': {source}", path.display())
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidTileIndex { index, pool_size } => {
                write!(
                    f,
                    "Tile index {index} is out of bounds (pool has {pool_size} tiles)"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export quilt to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Serialization { path, source } => {
                write!(f, "JSON error in '{}': {source}", path.display())
            }
            Self::Cancelled { iteration } => {
                write!(f, "Optimization cancelled at iteration {iteration}")
            }
        }
    }
}

impl std::error::Error for QuiltError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DecodeFailure { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::Serialization { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for quilt results
pub type Result<T> = std::result::Result<T, QuiltError>;

impl From<std::io::Error> for QuiltError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> QuiltError {
    QuiltError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a malformed pixel buffer error
pub fn malformed_input(side: usize, len: usize, reason: &impl ToString) -> QuiltError {
    QuiltError::MalformedInput {
        side,
        len,
        reason: reason.to_string(),
    }
}
