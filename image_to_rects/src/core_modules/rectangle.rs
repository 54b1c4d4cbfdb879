// THEORY:
// The `Rectangle` is both the unit of work of the coalescer and its final output.
// Every labeled cell starts life as a 1x1 rectangle; merging grows one rectangle
// and drops the one it absorbed. A rectangle never shrinks, so width and height
// stay at least 1 for its whole life.
//
// Like the other data types in `core_modules`, it is a "dumb" container: it can
// answer geometric questions about itself but does not decide when to merge.

use crate::core_modules::label_grid::Label;

/// An axis-aligned, labeled rectangle in grid units.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// The label shared by every cell the rectangle covers.
    pub label: Label,
    /// Column of the left edge.
    pub x: u32,
    /// Row of the top edge.
    pub y: u32,
    /// Width in cells, always >= 1.
    pub width: u32,
    /// Height in cells, always >= 1.
    pub height: u32,
}

impl Rectangle {
    /// A single cell at (`x`, `y`).
    pub fn unit(label: Label, x: u32, y: u32) -> Self {
        Self {
            label,
            x,
            y,
            width: 1,
            height: 1,
        }
    }

    pub fn new(label: Label, x: u32, y: u32, width: u32, height: u32) -> Self {
        debug_assert!(width >= 1 && height >= 1, "rectangles never have zero area");
        Self {
            label,
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// True when the two rectangles share at least one cell. Touching edges do
    /// not count.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn has_same_label(&self, other: &Rectangle) -> bool {
        self.label == other.label
    }
}
