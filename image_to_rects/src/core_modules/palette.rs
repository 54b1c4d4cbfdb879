// THEORY:
// The `Palette` is the dictionary artists paint with: each marker color stands
// for one label. Matching is exact on red, green and blue; alpha is ignored, so a
// half-transparent marker still counts. Pixels whose color is not defined become
// empty cells. The palette is the only place that knows about color at all: it
// turns a decoded image into a `LabelGrid` and nothing downstream sees a pixel.

use std::collections::HashMap;

use image::{DynamicImage, RgbaImage};

use crate::core_modules::label_grid::{Label, LabelGrid};
use crate::error::Result;

/// An exact RGB marker color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl MarkerColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

/// Maps marker colors to labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    labels: HashMap<MarkerColor, Label>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `color` to `label`. Redefining a color replaces its label.
    pub fn define(&mut self, label: impl Into<Label>, color: MarkerColor) {
        self.labels.insert(color, label.into());
    }

    pub fn label_for(&self, color: MarkerColor) -> Option<&Label> {
        self.labels.get(&color)
    }

    /// The color painted for `label`. When several colors share the label, the
    /// smallest one wins so the choice is stable.
    pub fn color_for(&self, label: &str) -> Option<MarkerColor> {
        self.labels
            .iter()
            .filter(|&(_, defined)| &**defined == label)
            .map(|(color, _)| *color)
            .min()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Builds the label grid for an RGBA image.
    pub fn label_image(&self, image: &RgbaImage) -> Result<LabelGrid> {
        let (width, height) = image.dimensions();
        let mut grid = LabelGrid::empty(width as usize, height as usize)?;
        for (x, y, pixel) in image.enumerate_pixels() {
            let [red, green, blue, _alpha] = pixel.0;
            if let Some(label) = self.label_for(MarkerColor::new(red, green, blue)) {
                grid.set(x as usize, y as usize, Some(label.clone()));
            }
        }
        Ok(grid)
    }

    /// Converts any decoded image to RGBA first.
    pub fn label_dynamic_image(&self, image: &DynamicImage) -> Result<LabelGrid> {
        self.label_image(&image.to_rgba8())
    }
}
