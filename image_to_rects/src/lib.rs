// THEORY:
// This file is the main entry point for the `image_to_rects` library crate.
// It exposes the `LevelPipeline` (and its parallel sibling) as the high-level
// interface for turning painted level images into labeled rectangles, plus the
// building blocks a caller may want to drive directly: the `LabelGrid`, the
// `coalescer` and the `Rectangle` it produces.
//
// The core algorithm (`core_modules::coalescer`) knows nothing about files,
// colors or output syntax. Everything around it (palette matching, config
// parsing, serialization, directory scanning) lives in its own module so the
// core can be tested on plain grids.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod serializer;

pub use config::{Config, OutputFormat};
pub use core_modules::coalescer::coalescer::{
    coalesce, coalesce_cells, coalesce_with_stats, merge_to_fixpoint,
};
pub use core_modules::coalescer::CoalesceStats;
pub use core_modules::label_grid::{Label, LabelGrid};
pub use core_modules::palette::{MarkerColor, Palette};
pub use core_modules::rectangle::Rectangle;
pub use error::{Error, Result};
