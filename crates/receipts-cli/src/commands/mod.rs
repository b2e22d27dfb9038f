//! Subcommands and the helpers they share.

pub mod clear;
pub mod config;
pub mod extract;
pub mod ingest;
pub mod list;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use receipts_core::ingest::UploadedFile;
use receipts_core::{AppConfig, ReceiptStore};

/// Options shared by every subcommand.
pub struct GlobalOpts {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
}

impl GlobalOpts {
    /// Config file in effect: `--config` if given, else the platform default.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }

    /// Load the config file, falling back to defaults when the default file is absent.
    ///
    /// An explicit `--config` path must exist.
    pub fn load_config(&self) -> anyhow::Result<AppConfig> {
        if let Some(path) = &self.config {
            return AppConfig::from_file(path).map_err(|e| {
                anyhow::anyhow!("Failed to load config {}: {}", path.display(), e)
            });
        }

        let path = default_config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            Ok(AppConfig::from_file(&path)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// Open the receipt store, honoring `--db` over the configured path.
    pub fn open_store(&self, config: &AppConfig) -> anyhow::Result<ReceiptStore> {
        let db_path = self.db.as_ref().unwrap_or(&config.storage.db_path);
        debug!("Opening receipt store at {}", db_path.display());
        ReceiptStore::open(db_path).map_err(|e| {
            anyhow::anyhow!("Failed to open database {}: {}", db_path.display(), e)
        })
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("receipts")
        .join("config.json")
}

/// Content type for a file, inferred from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Read a file from disk as an upload.
pub fn read_upload(path: &Path) -> anyhow::Result<UploadedFile> {
    let content = fs::read(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string());

    Ok(UploadedFile::new(filename, content, content_type_for(path)))
}
