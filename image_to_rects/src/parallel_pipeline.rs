use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::pipeline::{
    BatchReport, ImageReport, LevelPipeline, PipelineOptions, discover_images,
};

/// Runs the same per-image work as `LevelPipeline::run_batch`, but with up to
/// `workers` images in flight on tokio's blocking pool. The report lists images
/// in discovery order regardless of completion order.
pub struct ParallelPipeline {
    pipeline: LevelPipeline,
    workers: usize,
}

impl ParallelPipeline {
    /// `workers == 0` means one worker per logical CPU.
    pub fn new(pipeline: LevelPipeline, workers: usize) -> Self {
        let workers = if workers == 0 { num_cpus::get() } else { workers };
        Self {
            pipeline,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn run_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        options: PipelineOptions,
    ) -> Result<BatchReport> {
        let images = discover_images(input_dir)?;
        debug!(images = images.len(), workers = self.workers, "starting parallel batch");

        let permits = Arc::new(Semaphore::new(self.workers));
        let output_dir: Arc<Path> = Arc::from(output_dir);

        let tasks = images.into_iter().map(|input| {
            let permits = Arc::clone(&permits);
            let output_dir = Arc::clone(&output_dir);
            let pipeline = self.pipeline.clone();
            async move {
                let job = {
                    let input = input.clone();
                    move || pipeline.process_file(&input, &output_dir, options)
                };
                let outcome = run_job(permits, job).await;
                if let Err(e) = &outcome {
                    warn!(image = %input.display(), error = %e, "failed to process image");
                }
                (input, outcome)
            }
        });

        Ok(BatchReport {
            outcomes: join_all(tasks).await,
        })
    }
}

/// Runs one image's work on the blocking pool once a permit is free. A job that
/// panics comes back as `Error::Worker` for that image only.
async fn run_job<F>(permits: Arc<Semaphore>, job: F) -> Result<ImageReport>
where
    F: FnOnce() -> Result<ImageReport> + Send + 'static,
{
    let _permit = permits
        .acquire_owned()
        .await
        .map_err(|e| Error::Worker(e.to_string()))?;

    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| Error::Worker(e.to_string()))?
}
