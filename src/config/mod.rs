//! Application Configuration
//!
//! Connection settings for the Read API and the source image, stored in TOML
//! format with environment-variable overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variables that override file values when set.
const ENV_SUBSCRIPTION_KEY: &str = "OCR_REDACTOR_SUBSCRIPTION_KEY";
const ENV_ENDPOINT: &str = "OCR_REDACTOR_ENDPOINT";
const ENV_SOURCE_IMAGE_URL: &str = "OCR_REDACTOR_SOURCE_IMAGE_URL";

/// Run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API key for the OCR service
    pub subscription_key: String,
    /// Service endpoint, e.g. "https://myresource.cognitiveservices.azure.com"
    pub endpoint: String,
    /// URL of the image to fetch and redact
    pub source_image_url: String,
    /// Seconds to wait between status polls
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Maximum number of status polls before giving up
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_max_polls() -> u32 {
    60
}

/// Load settings from a TOML file, then apply environment overrides.
pub fn load_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read settings file {:?}", path))?;
    let mut settings: Settings =
        toml::from_str(&content).with_context(|| format!("invalid settings file {:?}", path))?;
    apply_env_overrides(&mut settings);
    validate(&settings)?;
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(key) = std::env::var(ENV_SUBSCRIPTION_KEY) {
        settings.subscription_key = key;
    }
    if let Ok(endpoint) = std::env::var(ENV_ENDPOINT) {
        settings.endpoint = endpoint;
    }
    if let Ok(url) = std::env::var(ENV_SOURCE_IMAGE_URL) {
        settings.source_image_url = url;
    }
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.subscription_key.is_empty() {
        anyhow::bail!("subscription_key is empty (set it in the file or {ENV_SUBSCRIPTION_KEY})");
    }
    if settings.endpoint.is_empty() {
        anyhow::bail!("endpoint is empty (set it in the file or {ENV_ENDPOINT})");
    }
    if settings.source_image_url.is_empty() {
        anyhow::bail!("source_image_url is empty (set it in the file or {ENV_SOURCE_IMAGE_URL})");
    }
    Ok(())
}
