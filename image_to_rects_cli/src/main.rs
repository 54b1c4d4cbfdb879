//! Batch converter from painted level images to rectangle lists.
//!
//! ```bash
//! # Convert every image in ./levels, writing .txt files to ./out
//! image_to_rects_cli --inf ./levels --outf ./out
//!
//! # Use a specific config file and write preview PNGs as well
//! image_to_rects_cli --inf ./levels --outf ./out --config palette.txt --preview
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use image_to_rects::Config;
use image_to_rects::config::DEFAULT_CONFIG_FILE;
use image_to_rects::parallel_pipeline::ParallelPipeline;
use image_to_rects::pipeline::{LevelPipeline, PipelineOptions};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Convert marker-colored level images into labeled rectangles
#[derive(Parser, Debug)]
#[command(name = "image_to_rects_cli", version, about, long_about = None)]
struct Args {
    /// Folder holding the input images (.png, .jpg, .gif)
    #[arg(long = "inf", visible_alias = "input", default_value = ".")]
    input_folder: PathBuf,

    /// Folder the .txt files are written to
    #[arg(long = "outf", visible_alias = "output", default_value = ".")]
    output_folder: PathBuf,

    /// Config file with SCALE, SEPERATOR, DEFINE and OUTPUT_FORMAT lines
    #[arg(long)]
    config: Option<PathBuf>,

    /// Images processed at once (0 = one per CPU)
    #[arg(long, default_value_t = 0)]
    jobs: usize,

    /// Also write <name>.preview.png with the rectangles painted back
    #[arg(long, default_value_t = false)]
    preview: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);
    run(args).await
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<()> {
    // --- 1. Directories ---
    let input = absolute(&args.input_folder)?;
    let output = absolute(&args.output_folder)?;
    info!("Input directory: {}", input.display());
    info!("Output directory: {}", output.display());

    if !input.is_dir() {
        bail!("the input folder must be a directory: {}", input.display());
    }
    if !output.is_dir() {
        bail!("the output folder must be a directory: {}", output.display());
    }

    // --- 2. Config ---
    let config = load_config(args.config.as_deref())?;
    if config.palette.is_empty() {
        warn!("no DEFINE lines in config, every image will produce an empty file");
    }

    // --- 3. Batch ---
    let pipeline = ParallelPipeline::new(LevelPipeline::new(config), args.jobs);
    let options = PipelineOptions {
        write_preview: args.preview,
    };
    let report = pipeline
        .run_batch(&input, &output, options)
        .await
        .with_context(|| format!("cannot scan {}", input.display()))?;

    if report.processed() == 0 {
        warn!("No input images found in the input directory");
    }
    for (path, error) in report.errors() {
        warn!("Error processing the image '{}': {}", path.display(), error);
    }
    info!("Finished processing {} image(s).", report.processed());

    if report.failed() > 0 {
        bail!("{} of {} image(s) failed", report.failed(), report.processed());
    }
    Ok(())
}

/// An explicit `--config` must exist; the default `config.txt` may be absent.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path)
            .with_context(|| format!("cannot load config {}", path.display())),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                Config::load(path)
                    .with_context(|| format!("cannot load config {}", path.display()))
            } else {
                warn!("{DEFAULT_CONFIG_FILE} not found, using defaults");
                Ok(Config::default())
            }
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("cannot resolve {}", path.display()))
}
