//! Tile pool: the caller's descriptors and how often each should appear

use crate::analysis::descriptor::TileDescriptor;
use crate::io::error::{QuiltError, Result};
use crate::spatial::grid::GridAssignment;

/// A descriptor with its requested repeat count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePoolEntry {
    /// Visual summary of the tile
    pub descriptor: TileDescriptor,
    /// Number of grid cells this tile should occupy
    pub count: usize,
    /// Human-readable name, usually the source file name
    pub label: Option<String>,
}

/// Ordered set of tiles available to the optimizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TilePool {
    entries: Vec<TilePoolEntry>,
}

impl TilePool {
    /// Create an empty pool
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an unlabeled tile and return its pool index
    pub fn push(&mut self, descriptor: TileDescriptor, count: usize) -> usize {
        self.push_entry(TilePoolEntry {
            descriptor,
            count,
            label: None,
        })
    }

    /// Add a fully specified entry and return its pool index
    pub fn push_entry(&mut self, entry: TilePoolEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Number of distinct tiles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool has no tiles
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in pool order
    pub fn entries(&self) -> &[TilePoolEntry] {
        &self.entries
    }

    /// Descriptor for a pool index
    pub fn descriptor(&self, index: usize) -> Option<&TileDescriptor> {
        self.entries.get(index).map(|entry| &entry.descriptor)
    }

    /// Change how many cells a tile should occupy
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` if `index` is not in the pool
    pub fn set_count(&mut self, index: usize, count: usize) -> Result<()> {
        let pool_size = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(QuiltError::InvalidTileIndex { index, pool_size })?;
        entry.count = count;
        Ok(())
    }

    /// Sum of all repeat counts
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Flat sequence of pool indices, each repeated `count` times, in pool order
    pub fn expand(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .flat_map(|(index, entry)| std::iter::repeat_n(index, entry.count))
            .collect()
    }

    /// Check that the counts fill a `rows × cols` grid exactly
    ///
    /// # Errors
    ///
    /// Returns `CapacityMismatch` iff the count total differs from `rows * cols`
    pub fn check_capacity(&self, rows: usize, cols: usize) -> Result<()> {
        let available = self.total_count();
        let required = rows.saturating_mul(cols);
        if available == required {
            Ok(())
        } else {
            Err(QuiltError::CapacityMismatch {
                available,
                required,
            })
        }
    }

    /// Check that every cell of a caller-built assignment names a pool tile
    ///
    /// # Errors
    ///
    /// Returns `InvalidTileIndex` for the first out-of-range cell
    pub fn check_assignment(&self, assignment: &GridAssignment) -> Result<()> {
        let pool_size = self.entries.len();
        match assignment.cells().iter().find(|&&index| index >= pool_size) {
            Some(&index) => Err(QuiltError::InvalidTileIndex { index, pool_size }),
            None => Ok(()),
        }
    }
}
