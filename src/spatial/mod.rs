//! Spatial data structures for quilt layouts
//!
//! This module contains:
//! - The grid assignment matrix and the manual cell swap
//! - The tile pool with repeat counts and capacity checks

/// Grid assignment matrix
pub mod grid;
/// Tile pool entries, expansion, and validation
pub mod pool;

pub use grid::GridAssignment;
pub use pool::{TilePool, TilePoolEntry};
