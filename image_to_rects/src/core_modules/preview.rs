// THEORY:
// Going back from rectangles to pixels. `implied_grid` paints a rectangle set onto
// an empty `LabelGrid`, which is how the coalescer output is checked against its
// input. `render_preview` does the same into an RGBA image using the palette's
// marker colors, so an artist can diff the exported geometry against the source
// painting.

use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgba, RgbaImage};

use crate::core_modules::label_grid::LabelGrid;
use crate::core_modules::palette::Palette;
use crate::core_modules::rectangle::Rectangle;
use crate::error::{Error, Result};

/// Paints every rectangle's label onto a `width x height` grid. Cells outside
/// the bounds are dropped.
pub fn implied_grid(rectangles: &[Rectangle], width: usize, height: usize) -> Result<LabelGrid> {
    let mut grid = LabelGrid::empty(width, height)?;
    for rect in rectangles {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                grid.set(x as usize, y as usize, Some(rect.label.clone()));
            }
        }
    }
    Ok(grid)
}

/// Paints rectangles in their label's marker color. Unlabeled cells, and labels
/// the palette has no color for, stay fully transparent.
pub fn render_preview(
    rectangles: &[Rectangle],
    width: u32,
    height: u32,
    palette: &Palette,
) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    for rect in rectangles {
        let Some(color) = palette.color_for(&rect.label) else {
            continue;
        };
        let pixel = Rgba([color.red, color.green, color.blue, 255]);
        for y in rect.y..rect.bottom().min(height) {
            for x in rect.x..rect.right().min(width) {
                image.put_pixel(x, y, pixel);
            }
        }
    }
    image
}

/// Writes an RGBA image as PNG.
pub fn save_png(path: &Path, image: &RgbaImage) -> Result<()> {
    let output = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let encoder = PngEncoder::new(std::io::BufWriter::new(output));

    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::label_grid::Label;
    use crate::core_modules::palette::MarkerColor;

    #[test]
    fn implied_grid_paints_every_cell() {
        let rects = vec![
            Rectangle::new(Label::from("a"), 0, 0, 2, 1),
            Rectangle::new(Label::from("b"), 1, 1, 1, 2),
        ];
        let grid = implied_grid(&rects, 3, 3).unwrap();
        assert_eq!(grid.labeled_count(), 4);
        assert_eq!(grid.get(1, 0).map(|l| l.as_ref()), Some("a"));
        assert_eq!(grid.get(1, 2).map(|l| l.as_ref()), Some("b"));
        assert!(grid.get(2, 2).is_none());
    }

    #[test]
    fn preview_uses_marker_colors() {
        let mut palette = Palette::new();
        palette.define("wall", MarkerColor::new(10, 20, 30));
        let rects = vec![
            Rectangle::new(Label::from("wall"), 1, 0, 1, 2),
            Rectangle::new(Label::from("unknown"), 0, 0, 1, 1),
        ];

        let image = render_preview(&rects, 2, 2, &palette);
        assert_eq!(image.get_pixel(1, 1), &Rgba([10, 20, 30, 255]));
        assert_eq!(image.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn save_png_round_trips_through_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.png");
        let image = RgbaImage::from_pixel(5, 3, Rgba([1, 2, 3, 255]));

        save_png(&path, &image).expect("Error Saving File.");

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (5, 3));
        assert_eq!(decoded.get_pixel(4, 2), &Rgba([1, 2, 3, 255]));
    }
}
