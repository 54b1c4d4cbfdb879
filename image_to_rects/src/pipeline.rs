// THEORY:
// The `pipeline` module is the top-level API for batch conversion. It wires the
// collaborators around the core into one flow per image:
//
//     decode -> palette lookup -> coalesce -> serialize -> write
//
// and repeats it for every image in a directory. Each image is independent: a
// failure (unreadable file, unsupported format, unwritable output) is recorded in
// the `BatchReport` for that image and the batch moves on.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::core_modules::coalescer::CoalesceStats;
use crate::core_modules::coalescer::coalescer::coalesce_with_stats;
use crate::core_modules::preview::{render_preview, save_png};
use crate::core_modules::rectangle::Rectangle;
use crate::error::{Error, Result};
use crate::serializer;

/// File extensions picked up by `discover_images`, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "gif"];

/// Per-run switches that are not part of the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Also write `<stem>.preview.png` next to each text file.
    pub write_preview: bool,
}

/// The result of coalescing one decoded image.
#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub width: u32,
    pub height: u32,
    pub rectangles: Vec<Rectangle>,
    pub stats: CoalesceStats,
}

/// What happened to one input file.
#[derive(Debug, Clone)]
pub struct ImageReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub preview: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub stats: CoalesceStats,
}

/// Outcomes of a whole batch, in discovery order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<(PathBuf, Result<ImageReport>)>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|(_, r)| r.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.processed() - self.succeeded()
    }

    pub fn errors(&self) -> impl Iterator<Item = (&Path, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|(path, r)| r.as_ref().err().map(|e| (path.as_path(), e)))
    }
}

/// Sequential batch converter.
#[derive(Debug, Clone)]
pub struct LevelPipeline {
    config: Arc<Config>,
}

impl LevelPipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Labels and coalesces one decoded image.
    pub fn analyze(&self, image: &DynamicImage) -> Result<ImageAnalysis> {
        let grid = self.config.palette.label_dynamic_image(image)?;
        let (rectangles, stats) = coalesce_with_stats(&grid);
        Ok(ImageAnalysis {
            width: image.width(),
            height: image.height(),
            rectangles,
            stats,
        })
    }

    /// Converts one image file and writes its text file (and preview) into
    /// `output_dir`.
    pub fn process_file(
        &self,
        input: &Path,
        output_dir: &Path,
        options: PipelineOptions,
    ) -> Result<ImageReport> {
        let image = image::open(input).map_err(|source| match source {
            image::ImageError::IoError(e) => Error::io(input, e),
            source => Error::Decode {
                path: input.to_path_buf(),
                source,
            },
        })?;

        let analysis = self.analyze(&image)?;
        let stem = output_stem(input);

        let output = output_dir.join(format!("{stem}.txt"));
        let text = serializer::render(&analysis.rectangles, &self.config)?;
        std::fs::write(&output, text).map_err(|e| Error::io(&output, e))?;

        let preview = if options.write_preview {
            let path = output_dir.join(format!("{stem}.preview.png"));
            let painted = render_preview(
                &analysis.rectangles,
                analysis.width,
                analysis.height,
                &self.config.palette,
            );
            save_png(&path, &painted)?;
            Some(path)
        } else {
            None
        };

        info!(
            image = %input.display(),
            seeded = analysis.stats.seeded,
            remaining = analysis.stats.remaining,
            rounds = analysis.stats.rounds,
            "combined {} rectangles into {}",
            analysis.stats.seeded,
            analysis.stats.remaining
        );

        Ok(ImageReport {
            input: input.to_path_buf(),
            output,
            preview,
            width: analysis.width,
            height: analysis.height,
            stats: analysis.stats,
        })
    }

    /// Converts every image directly inside `input_dir`.
    pub fn run_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        options: PipelineOptions,
    ) -> Result<BatchReport> {
        let images = discover_images(input_dir)?;
        let mut report = BatchReport::default();

        for input in images {
            let outcome = self.process_file(&input, output_dir, options);
            if let Err(e) = &outcome {
                warn!(image = %input.display(), error = %e, "failed to process image");
            }
            report.outcomes.push((input, outcome));
        }

        Ok(report)
    }
}

/// Image files directly inside `dir` (no recursion), sorted by file name.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            Error::io(path, e.into())
        })?;
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// The file name up to its first `.`: `level1.v2.png` becomes `level1`.
pub fn output_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.find('.') {
        Some(dot) => name[..dot].to_string(),
        None => name,
    }
}
