//! Energy model scoring how jarring a quilt layout looks
//!
//! Energy is the sum of independent soft constraints. Each constraint is a
//! pure scoring function registered in [`ENERGY_TERMS`]; adding a constraint
//! means adding an entry there, the optimizer only ever calls [`energy`].
//! Lower is better, and values are only comparable within one tile pool and
//! weight set.

use crate::analysis::descriptor::TileDescriptor;
use crate::io::configuration::{
    DEFAULT_BRIGHTNESS_WEIGHT, DEFAULT_COLOR_WEIGHT, DEFAULT_PATTERN_WEIGHT,
    DEFAULT_SPACING_WEIGHT, IDENTITY_PENALTY, LARGE_WINDOW_MIN_DIMENSION,
    LARGE_WINDOW_THRESHOLD, PATTERN_PENALTY, REGULARITY_RADIUS, SMALL_WINDOW_THRESHOLD,
};
use crate::math::distance::{offset_length, population_variance, rgb_distance};
use crate::spatial::{GridAssignment, TilePool};
use serde::{Deserialize, Serialize};

/// Top, bottom, left, right
const NEIGHBOR_OFFSETS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Tunable scale of each penalty family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyWeights {
    /// Scale of the adjacent similar-color penalty
    pub color_weight: f64,
    /// Scale of the adjacent similar-brightness and clustering penalties
    pub brightness_weight: f64,
    /// Scale of the adjacent same-pattern penalty
    pub pattern_weight: f64,
    /// Scale of the identical-neighbor and regularity penalties
    pub spacing_weight: f64,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self {
            color_weight: DEFAULT_COLOR_WEIGHT,
            brightness_weight: DEFAULT_BRIGHTNESS_WEIGHT,
            pattern_weight: DEFAULT_PATTERN_WEIGHT,
            spacing_weight: DEFAULT_SPACING_WEIGHT,
        }
    }
}

/// A cell and one of its 4-connected neighbours
#[derive(Debug, Clone, Copy)]
pub struct NeighborPair<'a> {
    /// Pool index in the cell
    pub index: usize,
    /// Pool index in the neighbouring cell
    pub neighbor_index: usize,
    /// Descriptor in the cell
    pub tile: &'a TileDescriptor,
    /// Descriptor in the neighbouring cell
    pub neighbor: &'a TileDescriptor,
}

/// Penalty for one directed pair of adjacent cells
pub type PairScore = fn(&NeighborPair<'_>, &EnergyWeights) -> f64;

/// Penalty computed from the whole grid at once
pub type GridScore = fn(&GridAssignment, &TilePool, &EnergyWeights) -> f64;

/// How a term inspects the grid
#[derive(Clone, Copy)]
pub enum TermScope {
    /// Summed over every cell and each of its in-bounds 4-neighbours
    Adjacent(PairScore),
    /// Evaluated once over the full grid
    Global(GridScore),
}

/// A named penalty in the energy sum
#[derive(Clone, Copy)]
pub struct EnergyTerm {
    /// Short identifier for logs and breakdowns
    pub name: &'static str,
    /// Scoring function
    pub scope: TermScope,
}

/// Every penalty contributing to [`energy`]
pub const ENERGY_TERMS: [EnergyTerm; 6] = [
    EnergyTerm {
        name: "identity",
        scope: TermScope::Adjacent(identity_penalty),
    },
    EnergyTerm {
        name: "color",
        scope: TermScope::Adjacent(color_penalty),
    },
    EnergyTerm {
        name: "brightness",
        scope: TermScope::Adjacent(brightness_penalty),
    },
    EnergyTerm {
        name: "pattern",
        scope: TermScope::Adjacent(pattern_penalty),
    },
    EnergyTerm {
        name: "regularity",
        scope: TermScope::Global(regularity_penalty),
    },
    EnergyTerm {
        name: "clustering",
        scope: TermScope::Global(brightness_clustering_penalty),
    },
];

/// Total energy of an assignment
///
/// Cells whose index is not in the pool contribute nothing.
pub fn energy(assignment: &GridAssignment, pool: &TilePool, weights: &EnergyWeights) -> f64 {
    ENERGY_TERMS
        .iter()
        .map(|term| term_energy(term, assignment, pool, weights))
        .sum()
}

/// Energy contributed by each term, in [`ENERGY_TERMS`] order
pub fn energy_breakdown(
    assignment: &GridAssignment,
    pool: &TilePool,
    weights: &EnergyWeights,
) -> Vec<(&'static str, f64)> {
    ENERGY_TERMS
        .iter()
        .map(|term| (term.name, term_energy(term, assignment, pool, weights)))
        .collect()
}

/// Energy contributed by a single term
pub fn term_energy(
    term: &EnergyTerm,
    assignment: &GridAssignment,
    pool: &TilePool,
    weights: &EnergyWeights,
) -> f64 {
    match term.scope {
        TermScope::Adjacent(score) => sum_adjacent(assignment, pool, weights, score),
        TermScope::Global(score) => score(assignment, pool, weights),
    }
}

fn sum_adjacent(
    assignment: &GridAssignment,
    pool: &TilePool,
    weights: &EnergyWeights,
    score: PairScore,
) -> f64 {
    let mut total = 0.0;
    for row in 0..assignment.rows() {
        for col in 0..assignment.cols() {
            let Some(index) = assignment.get(row, col) else {
                continue;
            };
            let Some(tile) = pool.descriptor(index) else {
                continue;
            };
            for (dr, dc) in NEIGHBOR_OFFSETS {
                let Some(neighbor_index) = assignment.get_offset(row, col, dr, dc) else {
                    continue;
                };
                let Some(neighbor) = pool.descriptor(neighbor_index) else {
                    continue;
                };
                let pair = NeighborPair {
                    index,
                    neighbor_index,
                    tile,
                    neighbor,
                };
                total += score(&pair, weights);
            }
        }
    }
    total
}

/// Identical tiles touching; the dominant penalty
pub fn identity_penalty(pair: &NeighborPair<'_>, weights: &EnergyWeights) -> f64 {
    if pair.index == pair.neighbor_index {
        IDENTITY_PENALTY * weights.spacing_weight
    } else {
        0.0
    }
}

/// Reciprocal of blurred color distance; similar colors cost more
pub fn color_penalty(pair: &NeighborPair<'_>, weights: &EnergyWeights) -> f64 {
    let distance = rgb_distance(
        pair.tile.blurred_dominant_color,
        pair.neighbor.blurred_dominant_color,
    );
    weights.color_weight / (distance + 1.0)
}

/// Reciprocal of brightness difference; similar brightness costs more
pub fn brightness_penalty(pair: &NeighborPair<'_>, weights: &EnergyWeights) -> f64 {
    let difference = (f64::from(pair.tile.brightness) - f64::from(pair.neighbor.brightness)).abs();
    weights.brightness_weight / (difference + 1.0)
}

/// Same pattern class touching
pub fn pattern_penalty(pair: &NeighborPair<'_>, weights: &EnergyWeights) -> f64 {
    if pair.tile.pattern_type == pair.neighbor.pattern_type {
        PATTERN_PENALTY * weights.pattern_weight
    } else {
        0.0
    }
}

/// Same tile recurring within a 5×5 neighbourhood, weighted by inverse distance
pub fn regularity_penalty(
    assignment: &GridAssignment,
    pool: &TilePool,
    weights: &EnergyWeights,
) -> f64 {
    let mut total = 0.0;
    for row in 0..assignment.rows() {
        for col in 0..assignment.cols() {
            let Some(index) = assignment.get(row, col) else {
                continue;
            };
            if pool.descriptor(index).is_none() {
                continue;
            }
            for dr in -REGULARITY_RADIUS..=REGULARITY_RADIUS {
                for dc in -REGULARITY_RADIUS..=REGULARITY_RADIUS {
                    if dr == 0 && dc == 0 {
                        continue;
                    }
                    if assignment.get_offset(row, col, dr, dc) == Some(index) {
                        total += weights.spacing_weight / offset_length(dr, dc);
                    }
                }
            }
        }
    }
    total
}

/// Sliding-window size and variance threshold for a grid
///
/// 3×3 with threshold 900 when both dimensions are at least 5, else 2×2 with 400.
pub fn clustering_window(rows: usize, cols: usize) -> (usize, f64) {
    if rows.min(cols) >= LARGE_WINDOW_MIN_DIMENSION {
        (3, LARGE_WINDOW_THRESHOLD)
    } else {
        (2, SMALL_WINDOW_THRESHOLD)
    }
}

/// Patches of uniform brightness; lower window variance costs more
pub fn brightness_clustering_penalty(
    assignment: &GridAssignment,
    pool: &TilePool,
    weights: &EnergyWeights,
) -> f64 {
    let (rows, cols) = (assignment.rows(), assignment.cols());
    let (window, threshold) = clustering_window(rows, cols);
    if rows < window || cols < window {
        return 0.0;
    }

    let mut clustering = 0.0;
    let mut brightnesses = Vec::with_capacity(window * window);
    for top in 0..=rows - window {
        for left in 0..=cols - window {
            brightnesses.clear();
            for r in top..top + window {
                for c in left..left + window {
                    if let Some(tile) = assignment.get(r, c).and_then(|i| pool.descriptor(i)) {
                        brightnesses.push(f64::from(tile.brightness));
                    }
                }
            }
            if brightnesses.len() != window * window {
                continue;
            }
            let variance = population_variance(&brightnesses);
            if variance < threshold {
                clustering += (threshold - variance) / 10.0;
            }
        }
    }

    clustering * weights.brightness_weight
}
