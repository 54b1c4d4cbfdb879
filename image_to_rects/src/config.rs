// THEORY:
// The config file is the artist-facing contract: which marker colors mean what,
// how far to scale grid units, and which output syntax the game engine expects.
// It is parsed once into an explicit `Config` value that is handed to the
// pipeline; nothing reads it from global state.
//
// Format: one directive per line, whitespace-separated tokens.
//
//     SCALE 16
//     SEPERATOR ,
//     DEFINE platform 0 0 0
//     OUTPUT_FORMAT JSON
//
// `SEPERATOR` keeps the historical spelling; `SEPARATOR` is accepted too.

use std::path::Path;
use std::str::FromStr;

use tracing::warn;

use crate::core_modules::palette::{MarkerColor, Palette};
use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.txt";

/// Output syntax handed to the serializer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `label SEP x SEP y SEP width SEP height SEP` line per rectangle.
    #[default]
    KeyPairs,
    /// A `var data = [ ... ];` array of JSON objects.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "KEYPAIRS" => Ok(OutputFormat::KeyPairs),
            "JSON" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown output format '{other}', expected KEYPAIRS or JSON"
            )),
        }
    }
}

/// Everything the pipeline needs besides the images themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Multiplier applied to every coordinate on output.
    pub scale: f32,
    /// Token written between fields in the key-pairs format.
    pub separator: String,
    pub output_format: OutputFormat,
    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scale: 1.0,
            separator: " ".to_string(),
            output_format: OutputFormat::KeyPairs,
            palette: Palette::new(),
        }
    }
}

impl Config {
    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        text.parse()
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let mut config = Config::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            let Some((&keyword, args)) = tokens.split_first() else {
                continue;
            };
            if keyword.starts_with('#') {
                continue;
            }

            match keyword {
                "SCALE" => {
                    let value = argument(args, 0, line, "SCALE needs a number")?;
                    config.scale = value
                        .parse()
                        .map_err(|_| Error::config(line, format!("invalid scale '{value}'")))?;
                }
                "SEPERATOR" | "SEPARATOR" => {
                    let value = argument(args, 0, line, "SEPERATOR needs a token")?;
                    config.separator = value.to_string();
                }
                "DEFINE" => {
                    const USAGE: &str = "DEFINE needs a label and three color components";
                    let label = argument(args, 0, line, USAGE)?;
                    let component = |i: usize| -> Result<u8> {
                        let value = argument(args, i, line, USAGE)?;
                        value.parse::<u8>().map_err(|_| {
                            let message = format!("color component '{value}' is not in 0..=255");
                            Error::config(line, message)
                        })
                    };
                    let color = MarkerColor::new(component(1)?, component(2)?, component(3)?);
                    config.palette.define(label, color);
                }
                "OUTPUT_FORMAT" => {
                    let value = argument(args, 0, line, "OUTPUT_FORMAT needs KEYPAIRS or JSON")?;
                    config.output_format =
                        value.parse().map_err(|e: String| Error::config(line, e))?;
                }
                other => {
                    warn!(line, keyword = other, "skipping unknown config directive");
                }
            }
        }

        Ok(config)
    }
}

fn argument<'a>(args: &[&'a str], index: usize, line: usize, message: &str) -> Result<&'a str> {
    args.get(index).copied().ok_or_else(|| Error::config(line, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.scale, 1.0);
        assert_eq!(config.separator, " ");
        assert_eq!(config.output_format, OutputFormat::KeyPairs);
        assert!(config.palette.is_empty());
    }

    #[test]
    fn parses_every_directive() {
        let text = "\
SCALE 16.5
SEPERATOR ,
DEFINE platform 0 0 0
DEFINE spawn 255 0 0
OUTPUT_FORMAT JSON
";
        let config: Config = text.parse().unwrap();
        assert_eq!(config.scale, 16.5);
        assert_eq!(config.separator, ",");
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.palette.len(), 2);
        assert_eq!(
            config.palette.label_for(MarkerColor::new(255, 0, 0)).map(|l| l.as_ref()),
            Some("spawn")
        );
    }

    #[test]
    fn accepts_corrected_separator_spelling() {
        let config: Config = "SEPARATOR |".parse().unwrap();
        assert_eq!(config.separator, "|");
    }

    #[test]
    fn skips_comments_blank_lines_and_unknown_keywords() {
        let text = "# level palette\n\n   \nGRAVITY 9.8\nDEFINE water 0 0 255\n";
        let config: Config = text.parse().unwrap();
        assert_eq!(config.palette.len(), 1);
    }

    #[test]
    fn reports_line_of_bad_color() {
        let text = "SCALE 2\nDEFINE lava 300 0 0\n";
        match text.parse::<Config>() {
            Err(Error::ConfigParse { line, message }) => {
                assert_eq!(line, 2);
                assert!(message.contains("300"), "{message}");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn reports_missing_arguments() {
        match "DEFINE lava 255 0".parse::<Config>() {
            Err(Error::ConfigParse { line: 1, message }) => {
                assert!(message.contains("three color components"), "{message}");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert!(matches!(
            "SCALE".parse::<Config>(),
            Err(Error::ConfigParse { line: 1, .. })
        ));
    }

    #[test]
    fn rejects_unknown_output_format() {
        assert!(matches!(
            "OUTPUT_FORMAT XML".parse::<Config>(),
            Err(Error::ConfigParse { line: 1, .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(Config::load(&missing), Err(Error::Io { .. })));
    }
}
