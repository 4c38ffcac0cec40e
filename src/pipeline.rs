//! Redaction Pipeline
//!
//! One pass per run: fetch the image, submit it for OCR, poll until the
//! operation is terminal, black out every matching line, persist the result.

use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::error::PipelineError;
use crate::fetch::ImageSource;
use crate::ocr::{poll_until_terminal, ReadClient, ReadStatus};
use crate::redact::{apply_redactions, collect_redactions};
use crate::storage::persist_jpeg;

/// Everything one run needs besides the service seams.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source_image_url: String,
    pub poll_interval: Duration,
    pub max_polls: u32,
    pub output_path: PathBuf,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct RunReport {
    /// Number of lines blacked out.
    pub redacted_lines: usize,
    /// Where the output JPEG was written.
    pub output_path: PathBuf,
}

/// Run the pipeline once. A fetch failure aborts before anything is
/// submitted for OCR.
pub async fn run(
    source: &dyn ImageSource,
    client: &dyn ReadClient,
    config: &PipelineConfig,
) -> Result<RunReport, PipelineError> {
    let image_bytes = source.fetch(&config.source_image_url).await?;

    let operation = client.submit(&image_bytes).await?;
    info!("Polling read operation {operation}");

    let outcome =
        poll_until_terminal(client, &operation, config.poll_interval, config.max_polls).await?;
    if outcome.status == ReadStatus::Failed {
        return Err(PipelineError::OcrFailed);
    }

    let rects = collect_redactions(outcome.pages());
    info!("Found {} line(s) to redact", rects.len());

    // A run with zero matches still writes the re-encoded image, so every
    // successful run produces the output artifact.
    let mut bitmap = image::load_from_memory(&image_bytes)?.into_rgb8();
    apply_redactions(&mut bitmap, &rects);
    persist_jpeg(&bitmap, &config.output_path)?;

    info!("Wrote redacted image to {:?}", config.output_path);
    Ok(RunReport {
        redacted_lines: rects.len(),
        output_path: config.output_path.clone(),
    })
}
