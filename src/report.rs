//! Structured export of an inspection as a JSON document.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::exif::Field;
use crate::pipeline::{FileAttributes, MetadataReport};

/// Exportable metadata document: file identity, extraction timestamp, and
/// the two display sections.
#[derive(Debug, Serialize)]
pub struct MetadataExport {
    pub file: String,
    pub size: u64,
    pub extracted_at: String,
    pub basic: Vec<Field>,
    pub exif: Vec<Field>,
}

impl MetadataExport {
    pub fn new(attributes: &FileAttributes, report: &MetadataReport) -> Self {
        Self {
            file: attributes.name.clone(),
            size: attributes.size,
            extracted_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            basic: report.basic.clone(),
            exif: report.exif.clone(),
        }
    }

    /// Write the document as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize metadata report")?;
        std::fs::write(path, contents).context("Failed to write metadata report")?;
        Ok(())
    }
}

/// Report filename derived from the image: `<stem>_metadata.json`.
pub fn export_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());
    image_path.with_file_name(format!("{stem}_metadata.json"))
}
