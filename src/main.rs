//! ocr-redactor - black out 16-digit grouped identifiers in a remote image
//!
//! Fetches an image from a URL, runs it through the cloud Read API, and
//! writes a copy with every matching line painted over.

mod config;
mod error;
mod fetch;
mod ocr;
mod pipeline;
mod redact;
mod storage;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::fetch::HttpImageSource;
use crate::ocr::AzureReadClient;
use crate::pipeline::PipelineConfig;

/// Redact 16-digit grouped identifiers from an image fetched over HTTP
#[derive(Parser, Debug)]
#[command(name = "ocr-redactor")]
#[command(about = "Fetch an image, OCR it, and black out 16-digit grouped identifiers")]
struct Args {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = "settings.toml")]
    config: PathBuf,

    /// Write the output here instead of the application data directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("could not initialize logging: {e}");
        return ExitCode::from(1);
    }

    let args = Args::parse();

    let settings = match config::load_settings(&args.config) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {e:#}");
            return ExitCode::from(1);
        }
    };

    let output_path = match args.output {
        Some(path) => path,
        None => match storage::get_data_dir() {
            Ok(dir) => dir.join(storage::OUTPUT_FILENAME),
            Err(e) => {
                error!("Could not resolve output directory: {e:#}");
                return ExitCode::from(1);
            }
        },
    };

    let http = reqwest::Client::new();
    let source = HttpImageSource::new(http.clone());
    let client = AzureReadClient::new(http, &settings.endpoint, &settings.subscription_key);

    let pipeline_config = PipelineConfig {
        source_image_url: settings.source_image_url.clone(),
        poll_interval: Duration::from_secs(settings.poll_interval_secs),
        max_polls: settings.max_polls,
        output_path,
    };

    match pipeline::run(&source, &client, &pipeline_config).await {
        Ok(report) => {
            info!(
                "Done: {} line(s) redacted, output at {:?}",
                report.redacted_lines, report.output_path
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
