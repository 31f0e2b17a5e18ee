//! Grid assignments: rows × cols matrices of tile-pool indices

use crate::io::error::{Result, invalid_parameter};
use ndarray::Array2;

/// One candidate layout, each cell holding an index into the tile pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridAssignment {
    cells: Array2<usize>,
}

impl GridAssignment {
    /// Lay a flat index sequence into a grid, row-major
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence.len() != rows * cols`
    pub fn from_sequence(rows: usize, cols: usize, sequence: Vec<usize>) -> Result<Self> {
        let len = sequence.len();
        let cells = Array2::from_shape_vec((rows, cols), sequence).map_err(|e| {
            invalid_parameter(
                "sequence",
                &len,
                &format!("cannot fill a {rows}x{cols} grid: {e}"),
            )
        })?;
        Ok(Self { cells })
    }

    /// Build a grid from nested rows
    ///
    /// # Errors
    ///
    /// Returns an error if the rows are empty or ragged
    pub fn from_rows(rows: &[Vec<usize>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != cols) {
            return Err(invalid_parameter(
                "rows",
                &rows.len(),
                &"all rows must have the same length",
            ));
        }
        Self::from_sequence(rows.len(), cols, rows.concat())
    }

    /// Wrap an existing matrix
    pub const fn from_array(cells: Array2<usize>) -> Self {
        Self { cells }
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.cells.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cells.ncols()
    }

    /// Tile index at `(row, col)`, if in bounds
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.cells.get([row, col]).copied()
    }

    /// Tile index at a signed offset from `(row, col)`; no wraparound
    pub fn get_offset(&self, row: usize, col: usize, dr: i64, dc: i64) -> Option<usize> {
        let r = usize::try_from(row as i64 + dr).ok()?;
        let c = usize::try_from(col as i64 + dc).ok()?;
        self.get(r, c)
    }

    /// Underlying matrix
    pub const fn cells(&self) -> &Array2<usize> {
        &self.cells
    }

    /// Swap the tiles in two cells; swapping a cell with itself is a no-op
    ///
    /// This is the manual drag-and-drop edit applied to a finished layout.
    ///
    /// # Errors
    ///
    /// Returns an error if either cell is outside the grid
    pub fn swap_cells(&mut self, first: [usize; 2], second: [usize; 2]) -> Result<()> {
        for cell in [first, second] {
            if self.cells.get(cell).is_none() {
                return Err(invalid_parameter(
                    "cell",
                    &format!("({}, {})", cell[0], cell[1]),
                    &format!("outside the {}x{} grid", self.rows(), self.cols()),
                ));
            }
        }
        self.cells.swap(first, second);
        Ok(())
    }

    /// Nested row vectors, for serialization and display
    pub fn to_rows(&self) -> Vec<Vec<usize>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Number of cells holding `index`
    pub fn occurrences(&self, index: usize) -> usize {
        self.cells.iter().filter(|&&cell| cell == index).count()
    }
}
