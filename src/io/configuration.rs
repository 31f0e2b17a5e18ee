//! Tuning constants and runtime configuration defaults

use crate::algorithm::annealing::OptimizationConfig;
use crate::io::error::{QuiltError, Result};
use std::path::Path;

/// Side length every tile image is resampled to before extraction
pub const TILE_SIDE: usize = 200;

/// Number of coarse histogram buckets retained per descriptor
pub const MAX_HISTOGRAM_BINS: usize = 64;

// Pattern classification thresholds, applied in order
/// Below this mean neighbor contrast a tile is solid
pub const SOLID_VARIANCE_THRESHOLD: f64 = 10.0;
/// Axis imbalance (fraction of total contrast) above which a tile is striped
pub const STRIPE_IMBALANCE_RATIO: f64 = 0.3;
/// Above this mean neighbor contrast a tile is floral
pub const FLORAL_VARIANCE_THRESHOLD: f64 = 40.0;
/// Above this mean neighbor contrast a tile is geometric
pub const GEOMETRIC_VARIANCE_THRESHOLD: f64 = 25.0;

// Energy model constants
/// Multiplier on `spacing_weight` when two identical tiles touch
pub const IDENTITY_PENALTY: f64 = 100.0;
/// Multiplier on `pattern_weight` when two tiles of the same pattern touch
pub const PATTERN_PENALTY: f64 = 10.0;
/// Chebyshev radius of the repeated-tile neighbourhood
pub const REGULARITY_RADIUS: i64 = 2;
/// Grids at least this large in both dimensions use the 3×3 clustering window
pub const LARGE_WINDOW_MIN_DIMENSION: usize = 5;
/// Brightness variance threshold for the 3×3 clustering window
pub const LARGE_WINDOW_THRESHOLD: f64 = 900.0;
/// Brightness variance threshold for the 2×2 clustering window
pub const SMALL_WINDOW_THRESHOLD: f64 = 400.0;

// Default energy weights
/// Weight for the adjacent similar-color term
pub const DEFAULT_COLOR_WEIGHT: f64 = 2.0;
/// Weight for the adjacent similar-brightness and clustering terms
pub const DEFAULT_BRIGHTNESS_WEIGHT: f64 = 1.5;
/// Weight for the adjacent same-pattern term
pub const DEFAULT_PATTERN_WEIGHT: f64 = 2.5;
/// Weight for the identity and regularity terms
pub const DEFAULT_SPACING_WEIGHT: f64 = 3.0;

// Default annealing schedule
/// Iteration budget per optimization run
pub const DEFAULT_MAX_ITERATIONS: usize = 5000;
/// Starting temperature
pub const DEFAULT_TEMPERATURE: f64 = 100.0;
/// Per-iteration temperature multiplier
pub const DEFAULT_COOLING_RATE: f64 = 0.995;

// Seeded generator parameters (Numerical Recipes LCG)
/// LCG multiplier
pub const LCG_MULTIPLIER: u32 = 1_664_525;
/// LCG increment
pub const LCG_INCREMENT: u32 = 1_013_904_223;

// Command-line defaults
/// Default grid rows
pub const DEFAULT_ROWS: usize = 4;
/// Default grid columns
pub const DEFAULT_COLS: usize = 4;
/// Default repeat count for every tile
pub const DEFAULT_TILE_COUNT: usize = 1;
/// Pixel size of one cell in the rendered quilt
pub const DEFAULT_RENDER_TILE_SIZE: u32 = 200;
/// File name of the rendered quilt when no output is given
pub const DEFAULT_OUTPUT_NAME: &str = "quilt_result.png";
/// Image extensions picked up when scanning a tile directory
pub const TILE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];
/// Largest grid dimension accepted from the command line
pub const MAX_GRID_DIMENSION: usize = 100;

/// Load an optimizer configuration from a JSON file
///
/// Keys match the flat field names (`color_weight`, `max_iterations`, ...);
/// missing keys fall back to the defaults above.
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read, `Serialization` if it is
/// not a valid configuration, or `InvalidParameter` if the values are unusable
pub fn read_config(path: &Path) -> Result<OptimizationConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| QuiltError::FileSystem {
        path: path.to_path_buf(),
        operation: "read config",
        source: e,
    })?;
    let config: OptimizationConfig =
        serde_json::from_str(&text).map_err(|e| QuiltError::Serialization {
            path: path.to_path_buf(),
            source: e,
        })?;
    config.validate()?;
    Ok(config)
}
