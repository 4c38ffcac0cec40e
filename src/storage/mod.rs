//! Storage Layer
//!
//! Resolves the local application-data directory and writes the redacted
//! image there as a maximum-quality JPEG.

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Fixed output filename, replaced on every run.
pub const OUTPUT_FILENAME: &str = "redacted.jpg";

/// JPEG quality for the output file.
const JPEG_QUALITY: u8 = 100;

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "ocrredactor", "OcrRedactor")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

    let data_dir = proj_dirs.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// Encode the bitmap as a quality-100 JPEG at `path`, overwriting any
/// existing file.
pub fn persist_jpeg(image: &RgbImage, path: &Path) -> Result<(), PipelineError> {
    write_jpeg(image, path).map_err(PipelineError::Persist)
}

fn write_jpeg(image: &RgbImage, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("could not create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    image
        .write_with_encoder(encoder)
        .with_context(|| format!("could not encode JPEG to {:?}", path))?;
    Ok(())
}
