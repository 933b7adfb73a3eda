//! Exporter configuration.

use crate::error::{Error, Result};
use crate::images::ImageDownloaderConfig;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which flat files to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    Json,
    Markdown,
    Csv,
    #[default]
    All,
}

impl ExportFormat {
    pub fn includes_json(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::All)
    }

    pub fn includes_markdown(&self) -> bool {
        matches!(self, ExportFormat::Markdown | ExportFormat::All)
    }

    pub fn includes_csv(&self) -> bool {
        matches!(self, ExportFormat::Csv | ExportFormat::All)
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            "all" => Ok(ExportFormat::All),
            other => Err(Error::config(format!(
                "unknown format '{}', expected json, markdown, csv or all",
                other
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Csv => "csv",
            ExportFormat::All => "all",
        })
    }
}

/// Configuration structure for the exporter.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory receiving flat files, bundles and archives.
    pub output_dir: PathBuf,
    /// Prefix of flat file names.
    pub base_name: String,
    /// Flat files to produce. Bundles always contain every format.
    pub format: ExportFormat,
    pub include_content: bool,
    /// Embed cover images in rendered Markdown.
    pub include_images: bool,
    /// Produce the directory bundle instead of flat files.
    pub bundle: bool,
    /// Archive the bundle and remove the directory afterwards.
    pub zip: bool,
    /// Customer label shown in reports.
    pub customer: Option<String>,
    /// Title of the bundle; also names its folder.
    pub bundle_title: String,
    /// List planned artifacts without writing anything.
    pub dry_run: bool,
    /// Image acquisition settings. `directory` is replaced per run.
    pub images: ImageDownloaderConfig,
}

impl ExportConfig {
    pub const DEFAULT_BASE_NAME: &'static str = "blog-export";
    pub const DEFAULT_BUNDLE_TITLE: &'static str = "Blog Export";
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("export"),
            base_name: Self::DEFAULT_BASE_NAME.to_string(),
            format: ExportFormat::All,
            include_content: true,
            include_images: true,
            bundle: false,
            zip: true,
            customer: None,
            bundle_title: Self::DEFAULT_BUNDLE_TITLE.to_string(),
            dry_run: false,
            images: ImageDownloaderConfig {
                enabled: false,
                ..ImageDownloaderConfig::default()
            },
        }
    }
}
