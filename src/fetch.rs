//! Image Fetcher
//!
//! Downloads the source image over HTTP. One attempt, no retries: a
//! non-success status aborts the run before anything is submitted for OCR.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::PipelineError;

/// Source of raw image bytes, abstracted so the pipeline can be exercised
/// without a network.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError>;
}

/// HTTP GET implementation backed by reqwest.
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        info!("Fetching source image from {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Fetched {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
