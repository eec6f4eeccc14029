//! Output sinks for rendered documents: file export and in-memory preview.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// File name used when an export request does not name one.
pub const DEFAULT_EXPORT_FILENAME: &str = "exported_template.html";

/// Errors that can occur while exporting.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Invalid export filename: {0}")]
    InvalidFilename(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Where an export landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportOutcome {
    /// Full path of the written file
    pub path: PathBuf,

    /// File name within the output folder
    pub filename: String,

    /// Name of the output folder
    pub folder: String,
}

/// Writes rendered documents into a fixed output folder.
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
    default_filename: String,
}

impl Exporter {
    /// Create an exporter writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            default_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }

    /// Override the file name used when none is given.
    pub fn with_default_filename(mut self, filename: impl Into<String>) -> Self {
        self.default_filename = filename.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `html` as UTF-8, replacing any file with the same name.
    ///
    /// The output folder is created if missing. A `None` or blank filename
    /// falls back to the default.
    pub fn export(&self, html: &str, filename: Option<&str>) -> Result<ExportOutcome, ExportError> {
        let filename = self.resolve_filename(filename)?;

        fs::create_dir_all(&self.output_dir).map_err(|e| ExportError::Io {
            path: self.output_dir.display().to_string(),
            source: e,
        })?;

        let path = self.output_dir.join(&filename);
        fs::write(&path, html).map_err(|e| ExportError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        tracing::info!("Exported {} ({} bytes)", path.display(), html.len());

        Ok(ExportOutcome {
            path,
            filename,
            folder: self.folder_name(),
        })
    }

    fn resolve_filename(&self, filename: Option<&str>) -> Result<String, ExportError> {
        let name = match filename.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(self.default_filename.clone()),
        };

        // Must stay inside the output folder
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(ExportError::InvalidFilename(name.to_string()));
        }

        Ok(name.to_string())
    }

    fn folder_name(&self) -> String {
        self.output_dir
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// A rendered document held for direct display, never written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub html: String,
}

impl Preview {
    pub fn new(html: String) -> Self {
        Self { html }
    }

    pub fn into_html(self) -> String {
        self.html
    }
}
