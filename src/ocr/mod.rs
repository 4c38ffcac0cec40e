//! OCR Layer
//!
//! Data model for the asynchronous Read operation plus the poll loop that
//! waits for a terminal status. The REST adapter lives in `azure`.

pub mod azure;

pub use azure::AzureReadClient;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::PipelineError;

/// Status of a Read operation as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    /// Any status value this client does not know. Treated as non-terminal
    /// so the poll loop keeps going until its retry bound instead of
    /// spinning forever on an unexpected value.
    Unknown(String),
}

impl From<String> for ReadStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "notStarted" => ReadStatus::NotStarted,
            "running" => ReadStatus::Running,
            "succeeded" => ReadStatus::Succeeded,
            "failed" => ReadStatus::Failed,
            _ => ReadStatus::Unknown(value),
        }
    }
}

impl ReadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReadStatus::Succeeded | ReadStatus::Failed)
    }
}

/// One recognized line: its text and the four corner points of its bounding
/// polygon, x/y interleaved (x0,y0,x1,y1,x2,y2,x3,y3).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadLine {
    pub text: String,
    pub bounding_box: [f32; 8],
}

/// Recognized lines for one page of the submitted image.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadPage {
    pub lines: Vec<ReadLine>,
}

/// Full poll response: status plus results once the operation succeeded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOutcome {
    pub status: ReadStatus,
    pub analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    pub read_results: Vec<ReadPage>,
}

impl ReadOutcome {
    /// All recognized pages, empty when the service returned none.
    pub fn pages(&self) -> &[ReadPage] {
        self.analyze_result
            .as_ref()
            .map(|r| r.read_results.as_slice())
            .unwrap_or(&[])
    }
}

/// Identifier correlating the submit call with later polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationId(String);

impl OperationId {
    /// Parse the operation id out of an Operation-Location reference by
    /// taking the last path segment. The service has historically used a
    /// 36-character UUID but the reference format is not guaranteed, so the
    /// segment is taken as-is.
    pub fn from_operation_location(location: &str) -> Result<Self, PipelineError> {
        let trimmed = location.split(['?', '#']).next().unwrap_or(location);
        match trimmed.rsplit('/').next() {
            Some(segment) if !segment.is_empty() && segment != trimmed => {
                Ok(OperationId(segment.to_string()))
            }
            _ => Err(PipelineError::OperationRef {
                location: location.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client for the two remote Read calls: submit bytes, poll by operation id.
#[async_trait]
pub trait ReadClient: Send + Sync {
    async fn submit(&self, image: &[u8]) -> Result<OperationId, PipelineError>;
    async fn poll(&self, operation: &OperationId) -> Result<ReadOutcome, PipelineError>;
}

/// Poll until the operation reaches Succeeded or Failed, sleeping `interval`
/// between requests. Gives up with `PollExhausted` after `max_polls`
/// requests so an unexpected status can never hang the run.
pub async fn poll_until_terminal<C: ReadClient + ?Sized>(
    client: &C,
    operation: &OperationId,
    interval: Duration,
    max_polls: u32,
) -> Result<ReadOutcome, PipelineError> {
    for attempt in 1..=max_polls {
        let outcome = client.poll(operation).await?;
        match &outcome.status {
            ReadStatus::Succeeded | ReadStatus::Failed => return Ok(outcome),
            ReadStatus::Running | ReadStatus::NotStarted => {
                debug!("Operation {operation} not terminal yet (attempt {attempt}/{max_polls})");
            }
            ReadStatus::Unknown(value) => {
                warn!("Operation {operation} reported unknown status {value:?} (attempt {attempt}/{max_polls})");
            }
        }
        if attempt < max_polls {
            tokio::time::sleep(interval).await;
        }
    }

    Err(PipelineError::PollExhausted {
        attempts: max_polls,
    })
}
