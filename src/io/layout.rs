//! JSON export of a finished layout and the tiles it references

use crate::algorithm::annealing::{AnnealingOutcome, OptimizationConfig};
use crate::analysis::descriptor::PatternType;
use crate::io::error::{QuiltError, Result};
use crate::spatial::{GridAssignment, TilePool};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Summary of one pool tile as written to the layout file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSummary {
    /// Source file name, or the pool index when unlabeled
    pub label: String,
    /// Requested repeat count
    pub count: usize,
    /// Mean RGB
    pub dominant_color: [u8; 3],
    /// Mean RGB after blurring
    pub blurred_dominant_color: [u8; 3],
    /// Mean brightness
    pub brightness: u8,
    /// Pattern class
    pub pattern_type: PatternType,
}

/// Serializable record of one optimization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Seed of the LCG source, absent for unseeded runs
    pub seed: Option<u32>,
    /// Energy of the starting shuffle
    pub initial_energy: f64,
    /// Energy of the exported layout
    pub best_energy: f64,
    /// Configuration the run used
    pub config: OptimizationConfig,
    /// Pool tiles, indexed by the values in `layout`
    pub tiles: Vec<TileSummary>,
    /// Pool indices, one row per grid row
    pub layout: Vec<Vec<usize>>,
}

impl LayoutDocument {
    /// Capture a run's result together with the pool it was computed from
    pub fn new(
        pool: &TilePool,
        outcome: &AnnealingOutcome,
        config: &OptimizationConfig,
        seed: Option<u32>,
    ) -> Self {
        let tiles = pool
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| TileSummary {
                label: entry
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("tile-{index}")),
                count: entry.count,
                dominant_color: entry.descriptor.dominant_color,
                blurred_dominant_color: entry.descriptor.blurred_dominant_color,
                brightness: entry.descriptor.brightness,
                pattern_type: entry.descriptor.pattern_type,
            })
            .collect();

        Self {
            rows: outcome.assignment.rows(),
            cols: outcome.assignment.cols(),
            seed,
            initial_energy: outcome.initial_energy,
            best_energy: outcome.best_energy,
            config: *config,
            tiles,
            layout: outcome.assignment.to_rows(),
        }
    }

    /// Rebuild the grid assignment from the stored rows
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are ragged or a cell names a missing tile
    pub fn assignment(&self) -> Result<GridAssignment> {
        let assignment = GridAssignment::from_rows(&self.layout)?;
        let pool_size = self.tiles.len();
        if let Some(&index) = assignment.cells().iter().find(|&&i| i >= pool_size) {
            return Err(QuiltError::InvalidTileIndex { index, pool_size });
        }
        Ok(assignment)
    }
}

/// Write a layout document as pretty-printed JSON
///
/// # Errors
///
/// Returns `Serialization` or `FileSystem` on failure
pub fn write_layout_json(document: &LayoutDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document).map_err(|e| QuiltError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, json).map_err(|e| QuiltError::FileSystem {
        path: path.to_path_buf(),
        operation: "write layout",
        source: e,
    })
}

/// Read a layout document written by [`write_layout_json`]
///
/// # Errors
///
/// Returns `FileSystem` if the file cannot be read or `Serialization` if it
/// does not parse
pub fn read_layout_json(path: &Path) -> Result<LayoutDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| QuiltError::FileSystem {
        path: path.to_path_buf(),
        operation: "read layout",
        source: e,
    })?;
    serde_json::from_str(&text).map_err(|e| QuiltError::Serialization {
        path: path.to_path_buf(),
        source: e,
    })
}
