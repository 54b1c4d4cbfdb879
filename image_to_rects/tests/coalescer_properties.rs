//! Property-based tests for the coalescer.
//!
//! Grids are small (up to 8x8) with up to three labels, which is enough to hit
//! every merge configuration while keeping the O(R^3) worst case cheap.

use image_to_rects::core_modules::preview::implied_grid;
use image_to_rects::{Label, LabelGrid, Rectangle, coalesce, merge_to_fixpoint};
use proptest::prelude::*;

const LABELS: [&str; 3] = ["platform", "spawn", "hazard"];

/// Random grid with labels drawn from the first `labels` entries of `LABELS`.
fn grid_strategy(labels: usize) -> impl Strategy<Value = LabelGrid> {
    (0usize..=8, 0usize..=8).prop_flat_map(move |(width, height)| {
        prop::collection::vec(prop::option::of(0..labels), width * height).prop_map(
            move |cells| {
                let cells = cells
                    .into_iter()
                    .map(|cell| cell.map(|i| Label::from(LABELS[i])))
                    .collect();
                LabelGrid::new(width, height, cells).unwrap()
            },
        )
    })
}

fn total_area(rects: &[Rectangle]) -> u64 {
    rects.iter().map(Rectangle::area).sum()
}

proptest! {
    /// Property: output rectangles never overlap, whatever the labels.
    #[test]
    fn no_overlap(grid in grid_strategy(3)) {
        let rects = coalesce(&grid);
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                prop_assert!(!a.intersects(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    /// Property: output area equals the number of labeled cells.
    #[test]
    fn area_is_conserved(grid in grid_strategy(3)) {
        let rects = coalesce(&grid);
        prop_assert_eq!(total_area(&rects), grid.labeled_count() as u64);
    }

    /// Property: every labeled cell is inside exactly one rectangle, and
    /// rectangles never cover unlabeled cells.
    #[test]
    fn labeled_cells_are_partitioned(grid in grid_strategy(3)) {
        let rects = coalesce(&grid);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let covering = rects
                    .iter()
                    .filter(|r| r.contains(x as u32, y as u32))
                    .count();
                let expected = usize::from(grid.get(x, y).is_some());
                prop_assert_eq!(covering, expected, "cell ({}, {})", x, y);
            }
        }
    }

    /// Property: with a single label, every cell keeps its label and painting
    /// the output back reproduces the input grid.
    #[test]
    fn single_label_output_reproduces_grid(grid in grid_strategy(1)) {
        let rects = coalesce(&grid);
        prop_assert_eq!(implied_grid(&rects, grid.width(), grid.height()).unwrap(), grid);
    }

    /// Property: coalescing the implied grid of a single-label output gives the
    /// same rectangles back.
    #[test]
    fn single_label_coalescing_is_idempotent(grid in grid_strategy(1)) {
        let first = coalesce(&grid);
        let implied = implied_grid(&first, grid.width(), grid.height()).unwrap();
        let second = coalesce(&implied);
        prop_assert_eq!(first, second);
    }

    /// Property: the output is a fixpoint; merging it again changes nothing.
    #[test]
    fn output_admits_no_further_merges(grid in grid_strategy(3)) {
        let mut rects = coalesce(&grid);
        let before = rects.clone();
        let stats = merge_to_fixpoint(&mut rects);
        prop_assert_eq!(stats.merged, 0);
        prop_assert_eq!(rects, before);
    }

    /// Property: rectangles stay non-degenerate and inside the grid.
    #[test]
    fn rectangles_stay_in_bounds(grid in grid_strategy(3)) {
        for rect in coalesce(&grid) {
            prop_assert!(rect.width >= 1 && rect.height >= 1);
            prop_assert!(rect.right() as usize <= grid.width());
            prop_assert!(rect.bottom() as usize <= grid.height());
        }
    }

    /// Property: vertical merges never mix labels, so a label that is never
    /// horizontally adjacent to another label survives untouched.
    #[test]
    fn isolated_columns_keep_their_labels(
        height in 1usize..=8,
        pattern in prop::collection::vec(0usize..3, 8),
    ) {
        // Column 0 and column 2 with an empty column between them: nothing can
        // touch horizontally across labels.
        let width = 3;
        let mut grid = LabelGrid::empty(width, height).unwrap();
        for y in 0..height {
            grid.set(0, y, Some(Label::from(LABELS[pattern[y]])));
            grid.set(2, y, Some(Label::from(LABELS[pattern[y]])));
        }
        let rects = coalesce(&grid);
        prop_assert_eq!(implied_grid(&rects, width, height).unwrap(), grid);
    }
}

#[test]
fn scenario_row_of_three() {
    let cells = vec![Some(Label::from("X")); 3];
    let rects = image_to_rects::coalesce_cells(cells, 3, 1).unwrap();
    assert_eq!(rects, vec![Rectangle::new(Label::from("X"), 0, 0, 3, 1)]);
}

#[test]
fn scenario_mismatched_grid_is_rejected() {
    let cells = vec![None; 7];
    assert!(matches!(
        image_to_rects::coalesce_cells(cells, 4, 2),
        Err(image_to_rects::Error::InvalidInput { .. })
    ));
}
