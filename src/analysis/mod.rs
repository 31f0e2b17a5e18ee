//! Feature extraction from fabric tile images

/// Tile descriptors and pattern classification
pub mod descriptor;
/// Raw pixel aggregates: sums, histogram, blur, contrast, borders
pub mod sampler;
