pub mod coalescer;
pub mod label_grid;
pub mod palette;
pub mod preview;
pub mod rectangle;
