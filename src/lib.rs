//! Quilt layout from photographed fabric tiles
//!
//! Each tile image is reduced to a deterministic descriptor (color, blurred
//! color, brightness, coarse histogram, pattern class, border strips). A
//! simulated annealing search then assigns tiles to grid cells so that
//! identical tiles, similar colors, similar brightness and matching patterns
//! are kept apart.

#![forbid(unsafe_code)]

/// Energy model and simulated annealing layout search
pub mod algorithm;
/// Descriptor extraction from pixel buffers
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Distance, variance and random source utilities
pub mod math;
/// Tile pool and grid assignment structures
pub mod spatial;

pub use algorithm::annealing::{OptimizationConfig, optimize_layout};
pub use algorithm::energy::{EnergyWeights, energy};
pub use analysis::descriptor::{PatternType, TileDescriptor, extract_descriptor};
pub use io::error::{QuiltError, Result};
pub use spatial::{GridAssignment, TilePool, TilePoolEntry};
