// THEORY:
// The `LabelGrid` is the only input the coalescer understands: a row-major grid
// where each cell either carries a label or is empty. It is the bridge between
// "an image painted with marker colors" and "a set of labeled cells", and it is
// where the single precondition of the core (cell count == width * height) is
// enforced, so nothing downstream ever indexes out of bounds.

use std::sync::Arc;

use crate::error::{Error, Result};

/// A label is shared, immutable text. Cloning one only bumps a reference count,
/// which matters because every seeded rectangle holds its own copy.
pub type Label = Arc<str>;

/// A validated `width x height` grid of optional labels, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGrid {
    width: usize,
    height: usize,
    cells: Vec<Option<Label>>,
}

impl LabelGrid {
    /// Wraps `cells` as a grid, failing if the cell count does not match the
    /// dimensions.
    pub fn new(width: usize, height: usize, cells: Vec<Option<Label>>) -> Result<Self> {
        let expected = cell_count(width, height, cells.len())?;
        if cells.len() != expected {
            return Err(Error::InvalidInput {
                width,
                height,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// A grid with every cell unlabeled.
    pub fn empty(width: usize, height: usize) -> Result<Self> {
        let count = cell_count(width, height, 0)?;
        Ok(Self {
            width,
            height,
            cells: vec![None; count],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// True for a grid with no cells at all (width or height of zero).
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&Label> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x].as_ref()
    }

    /// Overwrites one cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, label: Option<Label>) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = label;
        }
    }

    pub fn labeled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Row-major iteration yielding `(x, y, label)` for labeled cells only.
    pub fn labeled_cells(&self) -> impl Iterator<Item = (usize, usize, &Label)> + '_ {
        let width = self.width;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref().map(|label| (i % width, i / width, label))
        })
    }
}

/// `width * height`, or `InvalidInput` when the product overflows.
fn cell_count(width: usize, height: usize, actual: usize) -> Result<usize> {
    width.checked_mul(height).ok_or(Error::InvalidInput {
        width,
        height,
        expected: usize::MAX,
        actual,
    })
}
