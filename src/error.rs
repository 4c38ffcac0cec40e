//! Error taxonomy for the redaction pipeline
//!
//! Every failure category maps to a distinct process exit code so the tool
//! can be scripted (0 = success).

use thiserror::Error;

/// Failures a single redaction run can end with.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source image download returned a non-success HTTP status.
    #[error("image download failed with status {status}")]
    Fetch { status: u16 },

    /// Transport-level failure talking to the image host or the OCR service.
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The submit call did not yield a usable operation reference.
    #[error("could not parse operation id from operation location {location:?}")]
    OperationRef { location: String },

    /// The poll loop gave up after the configured number of attempts.
    #[error("OCR operation not terminal after {attempts} polls")]
    PollExhausted { attempts: u32 },

    /// The OCR service reported a terminal Failed status.
    #[error("OCR analysis failed")]
    OcrFailed,

    /// The fetched bytes could not be decoded as an image.
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Writing the redacted output file failed.
    #[error("could not persist output image: {0:#}")]
    Persist(anyhow::Error),
}

impl PipelineError {
    /// Stable exit code for scripting. 1 is reserved for config/setup errors
    /// surfaced through anyhow in main.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Fetch { .. } => 2,
            PipelineError::Transport(_)
            | PipelineError::OperationRef { .. }
            | PipelineError::PollExhausted { .. }
            | PipelineError::OcrFailed => 3,
            PipelineError::Decode(_) => 4,
            PipelineError::Persist(_) => 5,
        }
    }
}
