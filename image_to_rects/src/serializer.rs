// THEORY:
// The serializer is the last step and the only one that knows about output
// syntax. Rectangles come in with raw grid coordinates; every number is scaled
// here and printed as a float (whole numbers keep one decimal, `16.0`), which is
// what existing level loaders parse. The scale is read as `f32` but the product
// is taken in `f64`, so `SCALE 0.1` prints `0.30000000447034836` for `x = 3`,
// the same text existing exports carry.

use serde::Serialize;

use crate::config::{Config, OutputFormat};
use crate::core_modules::rectangle::Rectangle;
use crate::error::Result;

/// One rectangle after scaling, as written to the JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaledRect<'a> {
    pub tag: &'a str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl<'a> ScaledRect<'a> {
    pub fn new(rect: &'a Rectangle, scale: f32) -> Self {
        let scale = f64::from(scale);
        Self {
            tag: &rect.label,
            x: scale * f64::from(rect.x),
            y: scale * f64::from(rect.y),
            width: scale * f64::from(rect.width),
            height: scale * f64::from(rect.height),
        }
    }
}

/// Renders `rectangles` in the configured format.
pub fn render(rectangles: &[Rectangle], config: &Config) -> Result<String> {
    match config.output_format {
        OutputFormat::KeyPairs => Ok(render_key_pairs(
            rectangles,
            config.scale,
            &config.separator,
        )),
        OutputFormat::Json => render_json(rectangles, config.scale),
    }
}

/// `label SEP x SEP y SEP width SEP height SEP`, one rectangle per line. The
/// trailing separator is part of the format.
pub fn render_key_pairs(rectangles: &[Rectangle], scale: f32, separator: &str) -> String {
    let mut out = String::new();
    for rect in rectangles {
        let scaled = ScaledRect::new(rect, scale);
        out.push_str(scaled.tag);
        out.push_str(separator);
        for value in [scaled.x, scaled.y, scaled.width, scaled.height] {
            out.push_str(&format_number(value));
            out.push_str(separator);
        }
        out.push('\n');
    }
    out
}

/// `var data = [` then one JSON object per line, then `];`.
pub fn render_json(rectangles: &[Rectangle], scale: f32) -> Result<String> {
    let mut out = String::from("var data = [\n");
    for rect in rectangles {
        out.push_str(&serde_json::to_string(&ScaledRect::new(rect, scale))?);
        out.push_str(",\n");
    }
    out.push_str("];\n");
    Ok(out)
}

fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
