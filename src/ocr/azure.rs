//! Azure Read API adapter
//!
//! Plain REST client for the v3.2 Read endpoints, replacing the vendor SDK:
//! submit returns an Operation-Location header, results are polled by id.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::PipelineError;
use crate::ocr::{OperationId, ReadClient, ReadOutcome};

const ANALYZE_PATH: &str = "vision/v3.2/read/analyze";
const RESULTS_PATH: &str = "vision/v3.2/read/analyzeResults";
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Read API client bound to one endpoint and subscription key.
pub struct AzureReadClient {
    client: reqwest::Client,
    endpoint: String,
    subscription_key: String,
}

impl AzureReadClient {
    pub fn new(client: reqwest::Client, endpoint: &str, subscription_key: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            subscription_key: subscription_key.to_string(),
        }
    }
}

#[async_trait]
impl ReadClient for AzureReadClient {
    async fn submit(&self, image: &[u8]) -> Result<OperationId, PipelineError> {
        let url = format!("{}/{ANALYZE_PATH}", self.endpoint);
        debug!("Submitting {} image bytes to {url}", image.len());

        let response = self
            .client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await?
            .error_for_status()?;

        let location = response
            .headers()
            .get("Operation-Location")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| PipelineError::OperationRef {
                location: String::new(),
            })?;

        let operation = OperationId::from_operation_location(location)?;
        info!("Read operation accepted, id {operation}");
        Ok(operation)
    }

    async fn poll(&self, operation: &OperationId) -> Result<ReadOutcome, PipelineError> {
        let url = format!("{}/{RESULTS_PATH}/{}", self.endpoint, operation.as_str());

        let outcome: ReadOutcome = self
            .client
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.subscription_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Operation {operation} status {:?}", outcome.status);
        Ok(outcome)
    }
}
