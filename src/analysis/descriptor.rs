//! Tile descriptors: the fixed-shape summary of one fabric photograph
//!
//! A descriptor is computed once from a resampled square image and never
//! mutated afterwards. Extraction is deterministic: the same bytes and side
//! always produce an identical descriptor.

use crate::analysis::sampler::{HistogramBin, NeighborContrast, PixelBuffer};
use crate::io::configuration::{
    FLORAL_VARIANCE_THRESHOLD, GEOMETRIC_VARIANCE_THRESHOLD, SOLID_VARIANCE_THRESHOLD,
    STRIPE_IMBALANCE_RATIO,
};
use crate::io::error::Result;
use crate::math::distance::round_to_byte;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse visual pattern class of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Nearly uniform color
    Solid,
    /// Contrast concentrated along one axis
    Striped,
    /// Moderate, balanced contrast
    Geometric,
    /// High, balanced contrast
    Floral,
    /// Low-to-moderate, balanced contrast
    Abstract,
}

impl PatternType {
    /// Every pattern class, in declaration order
    pub const ALL: [Self; 5] = [
        Self::Solid,
        Self::Striped,
        Self::Geometric,
        Self::Floral,
        Self::Abstract,
    ];

    /// Lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Striped => "striped",
            Self::Geometric => "geometric",
            Self::Floral => "floral",
            Self::Abstract => "abstract",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Border strips sampled from the four sides of the tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStrips {
    /// Top row, left to right
    pub top: Vec<[u8; 3]>,
    /// Right column, top to bottom
    pub right: Vec<[u8; 3]>,
    /// Bottom row, left to right
    pub bottom: Vec<[u8; 3]>,
    /// Left column, top to bottom
    pub left: Vec<[u8; 3]>,
}

/// Numeric summary of one tile image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileDescriptor {
    /// Rounded mean RGB
    pub dominant_color: [u8; 3],
    /// Rounded mean RGB after a 5×5 Gaussian blur
    pub blurred_dominant_color: [u8; 3],
    /// Rounded mean of per-pixel channel averages
    pub brightness: u8,
    /// First 64 coarse color buckets encountered, with counts
    pub color_histogram: Vec<HistogramBin>,
    /// Pattern class from neighbor contrast
    pub pattern_type: PatternType,
    /// Border color strips
    pub edges: EdgeStrips,
}

/// Extract a descriptor from a `side × side` RGB or RGBA buffer
///
/// The channel count is inferred from the buffer length.
///
/// # Errors
///
/// Returns `MalformedInput` if the buffer length is not `side²·3` or `side²·4`
pub fn extract_descriptor(pixels: &[u8], side: usize) -> Result<TileDescriptor> {
    let buffer = PixelBuffer::infer(pixels, side)?;
    Ok(build_descriptor(&buffer))
}

/// Compose sampler aggregates into a descriptor
pub fn build_descriptor(buffer: &PixelBuffer<'_>) -> TileDescriptor {
    let sums = buffer.channel_sums();
    let count = sums.count.max(1) as f64;
    let dominant_color = sums.rgb.map(|sum| round_to_byte(sum as f64 / count));
    let brightness = round_to_byte(sums.intensity / count);

    let blurred_dominant_color = buffer.blurred_mean().map(round_to_byte);

    TileDescriptor {
        dominant_color,
        blurred_dominant_color,
        brightness,
        color_histogram: buffer.histogram(),
        pattern_type: classify_pattern(buffer.neighbor_contrast(), buffer.side()),
        edges: extract_edges(buffer),
    }
}

/// Classify neighbor contrast into a pattern type; the first matching rule wins
pub fn classify_pattern(contrast: NeighborContrast, side: usize) -> PatternType {
    let total = contrast.total();
    let area = (side * side).max(1) as f64;
    let avg_variance = total / (2.0 * area);

    if avg_variance < SOLID_VARIANCE_THRESHOLD {
        PatternType::Solid
    } else if (contrast.horizontal - contrast.vertical).abs() > STRIPE_IMBALANCE_RATIO * total {
        PatternType::Striped
    } else if avg_variance > FLORAL_VARIANCE_THRESHOLD {
        PatternType::Floral
    } else if avg_variance > GEOMETRIC_VARIANCE_THRESHOLD {
        PatternType::Geometric
    } else {
        PatternType::Abstract
    }
}

fn extract_edges(buffer: &PixelBuffer<'_>) -> EdgeStrips {
    let last = buffer.side() - 1;
    EdgeStrips {
        top: buffer.row(0),
        right: buffer.column(last),
        bottom: buffer.row(last),
        left: buffer.column(0),
    }
}
