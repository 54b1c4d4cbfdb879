// THEORY:
// The `Coalescer` is the engine of the whole tool. It turns a grid of labeled
// cells into a short list of labeled rectangles by repeatedly merging neighbors.
//
// Algorithm steps:
// 1.  **Seeding**: Scan the grid row by row, left to right, and create one 1x1
//     `Rectangle` per labeled cell. Seeding order is scan order, and because every
//     later step walks the working set by index, the output is deterministic.
// 2.  **Horizontal sub-pass**: For every ordered pair (current, other) of live
//     rectangles, if both sit on the same row band (same `y`, same `height`) and
//     touch left-to-right with no gap, `current` absorbs `other`. This sub-pass
//     does NOT compare labels: two differently-labeled cells that touch on a row
//     collapse into one rectangle carrying `current`'s label, and the other
//     label is lost. Touching regions with different labels therefore need a
//     gap in the painting to survive.
// 3.  **Vertical sub-pass**: The same, on column bands (same `x`, same `width`),
//     touching top-to-bottom, and only between rectangles with the same label.
// 4.  **Fixpoint**: A round is one horizontal sub-pass followed by one vertical
//     sub-pass. Rounds repeat until one performs zero merges. Every merge removes
//     a rectangle, so the loop always terminates.
//
// The working set is a plain `Vec` with tombstones. Absorbed rectangles become
// `None` and are skipped for the rest of the sub-pass, then the vector is
// compacted. A rectangle that grows early in a sub-pass is compared with its
// new geometry for the rest of that sub-pass, so it can keep absorbing. Every
// live pair is visited, so on some grids the decomposition differs from the
// one the legacy exporter wrote; level files regenerated here are not
// guaranteed to match older exports line for line.
//
// The result is a local minimum, not an optimal rectangle cover. Each sub-pass
// is O(R^2) in the number of live rectangles; this is meant for level art, not
// million-cell images.

use crate::core_modules::label_grid::{Label, LabelGrid};
use crate::core_modules::rectangle::Rectangle;

/// Bookkeeping from one coalescing run, mostly for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalesceStats {
    /// Unit rectangles created by seeding.
    pub seeded: usize,
    /// Total number of merges performed.
    pub merged: usize,
    /// Rounds executed, including the final round that found nothing to merge.
    pub rounds: usize,
    /// Rectangles left when the fixpoint was reached.
    pub remaining: usize,
}

/// Which sub-pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

pub mod coalescer {
    use super::*; // Make structs from parent module available.
    use crate::error::Result;
    use tracing::debug;

    /// Coalesces a validated grid into labeled rectangles.
    pub fn coalesce(grid: &LabelGrid) -> Vec<Rectangle> {
        coalesce_with_stats(grid).0
    }

    /// Same as [`coalesce`], also reporting how much work was done.
    pub fn coalesce_with_stats(grid: &LabelGrid) -> (Vec<Rectangle>, CoalesceStats) {
        let mut rectangles = seed(grid);
        let seeded = rectangles.len();
        let mut stats = merge_to_fixpoint(&mut rectangles);
        stats.seeded = seeded;
        (rectangles, stats)
    }

    /// Raw form: `cells` is row-major and must hold exactly `width * height`
    /// entries, otherwise `Error::InvalidInput` is returned.
    pub fn coalesce_cells(
        cells: Vec<Option<Label>>,
        width: usize,
        height: usize,
    ) -> Result<Vec<Rectangle>> {
        let grid = LabelGrid::new(width, height, cells)?;
        Ok(coalesce(&grid))
    }

    /// Phase 1: one 1x1 rectangle per labeled cell, in row-major order.
    pub fn seed(grid: &LabelGrid) -> Vec<Rectangle> {
        grid.labeled_cells()
            .map(|(x, y, label)| Rectangle::unit(label.clone(), x as u32, y as u32))
            .collect()
    }

    /// Phase 2: runs horizontal-then-vertical rounds until a round merges
    /// nothing. Works on any rectangle set, so it can be re-run on a previous
    /// output (which then reports zero merges). `seeded` is left at zero.
    pub fn merge_to_fixpoint(rectangles: &mut Vec<Rectangle>) -> CoalesceStats {
        let mut stats = CoalesceStats::default();

        loop {
            stats.rounds += 1;
            let horizontal = merge_pass(rectangles, Axis::Horizontal);
            let vertical = merge_pass(rectangles, Axis::Vertical);
            let combinations = horizontal + vertical;
            stats.merged += combinations;

            debug!(
                round = stats.rounds,
                horizontal,
                vertical,
                remaining = rectangles.len(),
                "merge round finished"
            );

            if combinations == 0 {
                break;
            }
        }

        stats.remaining = rectangles.len();
        stats
    }

    /// One sub-pass over the whole working set. Returns the number of merges.
    fn merge_pass(rectangles: &mut Vec<Rectangle>, axis: Axis) -> usize {
        let mut working: Vec<Option<Rectangle>> = rectangles.drain(..).map(Some).collect();
        let mut combinations = 0;

        for k in 0..working.len() {
            for h in 0..working.len() {
                if h == k {
                    continue;
                }
                // Either side may have been absorbed earlier in this pass.
                let grown = match (&working[k], &working[h]) {
                    (Some(current), Some(other)) => absorb(current, other, axis),
                    _ => None,
                };
                if let Some(grown) = grown {
                    working[k] = Some(grown);
                    working[h] = None;
                    combinations += 1;
                }
            }
        }

        rectangles.extend(working.into_iter().flatten());
        combinations
    }

    /// What `current` becomes after absorbing `other`, or `None` when the pair
    /// is not mergeable along `axis`.
    fn absorb(current: &Rectangle, other: &Rectangle, axis: Axis) -> Option<Rectangle> {
        match axis {
            Axis::Horizontal => {
                if current.y != other.y || current.height != other.height {
                    return None;
                }
                if current.x == other.right() {
                    // other is immediately to the left
                    Some(Rectangle {
                        x: other.x,
                        width: current.width + other.width,
                        ..current.clone()
                    })
                } else if other.x == current.right() {
                    Some(Rectangle {
                        width: current.width + other.width,
                        ..current.clone()
                    })
                } else {
                    None
                }
            }
            Axis::Vertical => {
                if !other.has_same_label(current) {
                    return None;
                }
                if current.x != other.x || current.width != other.width {
                    return None;
                }
                if current.y == other.bottom() {
                    // other is immediately above
                    Some(Rectangle {
                        y: other.y,
                        height: current.height + other.height,
                        ..current.clone()
                    })
                } else if other.y == current.bottom() {
                    Some(Rectangle {
                        height: current.height + other.height,
                        ..current.clone()
                    })
                } else {
                    None
                }
            }
        }
    }

}
