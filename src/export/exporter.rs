//! The export pipeline: acquire images, rewrite, render, report, package.

use super::bundle::{markdown_file_names, BundleStructure, MARKDOWN_TO_ROOT};
use super::config::ExportConfig;
use super::csv::render_csv;
use super::json::render_json;
use super::markdown::{render_document, render_post, RenderOptions};
use crate::archive::{package_bundle, ArchiveInfo};
use crate::error::{Error, Result};
use crate::http::Fetch;
use crate::images::{ImageDownloader, ImageDownloaderConfig};
use crate::model::{Ledger, Post};
use crate::report::{
    render_delivery_readme, render_summary_json, render_summary_markdown, ReportMeta,
    SummaryReport,
};
use crate::rewrite::{relocate_post, rewrite_posts};
use crate::utils::{sanitize_filename, timestamp_slug};

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Output layout of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportMode {
    /// Timestamped files directly in the output directory.
    Flat,
    /// A directory tree, optionally archived.
    Bundle,
}

/// What a run produced, or would have produced in dry-run mode.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub mode: ExportMode,
    pub dry_run: bool,
    /// Every file written, in write order. An archived bundle is listed as
    /// its archive only.
    pub artifacts: Vec<PathBuf>,
    /// Bundle directory left on disk, when not archived.
    pub bundle_dir: Option<PathBuf>,
    pub archive: Option<ArchiveInfo>,
    pub ledger: Ledger,
    pub report: SummaryReport,
}

/// Runs exports according to an [`ExportConfig`].
///
/// Created with [`ExporterBuilder`](super::ExporterBuilder).
#[derive(Clone)]
pub struct Exporter {
    config: ExportConfig,
    fetcher: Arc<dyn Fetch>,
}

impl fmt::Debug for Exporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Exporter")
            .field("config", &self.config)
            .finish()
    }
}

async fn write_file(path: &Path, contents: &str, artifacts: &mut Vec<PathBuf>) -> Result<()> {
    fs::write(path, contents).await?;
    debug!(path = %path.display(), bytes = contents.len(), "Artifact written");
    artifacts.push(path.to_path_buf());
    Ok(())
}

impl Exporter {
    pub(crate) fn new(config: ExportConfig, fetcher: Arc<dyn Fetch>) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            include_content: self.config.include_content,
            include_images: self.config.include_images,
        }
    }

    fn report_meta(&self, now: DateTime<Utc>) -> ReportMeta {
        ReportMeta {
            generated_at: now,
            customer: self.config.customer.clone(),
            bundle_title: self.config.bundle_title.clone(),
        }
    }

    /// Downloader storing images below `root`.
    fn downloader(&self, root: PathBuf) -> ImageDownloader {
        let config = ImageDownloaderConfig {
            directory: root,
            ..self.config.images.clone()
        };
        ImageDownloader::new(config, Arc::clone(&self.fetcher))
    }

    /// Export `posts`. `now` stamps file names and reports.
    ///
    /// Image failures never fail the run; they are listed in the outcome's
    /// ledger and report. Write and archive failures are fatal.
    pub async fn export(&self, posts: &[Post], now: DateTime<Utc>) -> Result<ExportOutcome> {
        let stamp = timestamp_slug(&now);
        info!(
            posts = posts.len(),
            bundle = self.config.bundle,
            dry_run = self.config.dry_run,
            "Starting export"
        );

        if self.config.bundle {
            self.export_bundle(posts, &stamp, now).await
        } else {
            self.export_flat(posts, &stamp, now).await
        }
    }

    async fn export_flat(
        &self,
        posts: &[Post],
        stamp: &str,
        now: DateTime<Utc>,
    ) -> Result<ExportOutcome> {
        let config = &self.config;
        let dir = &config.output_dir;
        let file = |ext: &str| dir.join(format!("{}-{}.{}", config.base_name, stamp, ext));

        if config.dry_run {
            let mut planned = Vec::new();
            if config.format.includes_json() {
                planned.push(file("json"));
            }
            if config.format.includes_markdown() {
                planned.push(file("md"));
            }
            if config.format.includes_csv() {
                planned.push(file("csv"));
            }
            info!(artifacts = planned.len(), "Dry run, nothing written");
            return Ok(self.outcome(ExportMode::Flat, planned, posts, Ledger::new(), now));
        }

        fs::create_dir_all(dir).await?;
        let (map, ledger) = self.downloader(dir.clone()).download(posts).await;
        let posts = rewrite_posts(posts, &map);

        let mut artifacts = Vec::new();
        if config.format.includes_json() {
            write_file(&file("json"), &render_json(&posts)?, &mut artifacts).await?;
        }
        if config.format.includes_markdown() {
            let doc = render_document(&posts, &self.render_options(), &config.bundle_title, &now);
            write_file(&file("md"), &doc, &mut artifacts).await?;
        }
        if config.format.includes_csv() {
            let csv = render_csv(&posts, config.include_content);
            write_file(&file("csv"), &csv, &mut artifacts).await?;
        }

        info!(artifacts = artifacts.len(), "Export finished");
        Ok(self.outcome(ExportMode::Flat, artifacts, &posts, ledger, now))
    }

    async fn export_bundle(
        &self,
        posts: &[Post],
        stamp: &str,
        now: DateTime<Utc>,
    ) -> Result<ExportOutcome> {
        let config = &self.config;
        let folder = format!("{}-{}", sanitize_filename(&config.bundle_title), stamp);
        let layout = BundleStructure::new(config.output_dir.join(&folder));
        let archive_path = config.output_dir.join(format!("{}.zip", folder));
        let names = markdown_file_names(posts);

        if config.dry_run {
            let planned = if config.zip {
                vec![archive_path]
            } else {
                let mut planned: Vec<PathBuf> = names
                    .iter()
                    .map(|name| layout.posts_markdown.join(name))
                    .collect();
                planned.extend([
                    layout.posts_json_file(),
                    layout.posts_csv_file(),
                    layout.summary_json_file(),
                    layout.summary_markdown_file(),
                    layout.readme_file(),
                ]);
                planned
            };
            info!(artifacts = planned.len(), "Dry run, nothing written");
            let mut outcome = self.outcome(ExportMode::Bundle, planned, posts, Ledger::new(), now);
            if !config.zip {
                outcome.bundle_dir = Some(layout.root);
            }
            return Ok(outcome);
        }

        layout.create().await?;
        let (map, ledger) = self.downloader(layout.root.clone()).download(posts).await;
        let posts = rewrite_posts(posts, &map);

        let mut artifacts = Vec::new();
        let opts = self.render_options();
        for (post, name) in posts.iter().zip(&names) {
            let doc = render_post(&relocate_post(post, MARKDOWN_TO_ROOT), &opts, 1);
            write_file(&layout.posts_markdown.join(name), &doc, &mut artifacts).await?;
        }
        write_file(&layout.posts_json_file(), &render_json(&posts)?, &mut artifacts).await?;
        let csv = render_csv(&posts, config.include_content);
        write_file(&layout.posts_csv_file(), &csv, &mut artifacts).await?;

        let report = SummaryReport::build(&posts, &ledger, &self.report_meta(now));
        write_file(
            &layout.summary_json_file(),
            &render_summary_json(&report)?,
            &mut artifacts,
        )
        .await?;
        write_file(
            &layout.summary_markdown_file(),
            &render_summary_markdown(&report),
            &mut artifacts,
        )
        .await?;
        write_file(
            &layout.readme_file(),
            &render_delivery_readme(&report),
            &mut artifacts,
        )
        .await?;

        let mut outcome = ExportOutcome {
            mode: ExportMode::Bundle,
            dry_run: false,
            artifacts,
            bundle_dir: None,
            archive: None,
            ledger,
            report,
        };

        if config.zip {
            let staging = layout.root.clone();
            let target = archive_path.clone();
            let archive = tokio::task::spawn_blocking(move || {
                package_bundle(&staging, &target, &folder)
            })
            .await
            .map_err(|e| Error::Internal(format!("archive task failed: {}", e)))??;
            outcome.artifacts = vec![archive.path.clone()];
            outcome.archive = Some(archive);
        } else {
            outcome.bundle_dir = Some(layout.root);
        }

        info!(artifacts = outcome.artifacts.len(), "Export finished");
        Ok(outcome)
    }

    fn outcome(
        &self,
        mode: ExportMode,
        artifacts: Vec<PathBuf>,
        posts: &[Post],
        ledger: Ledger,
        now: DateTime<Utc>,
    ) -> ExportOutcome {
        let report = SummaryReport::build(posts, &ledger, &self.report_meta(now));
        ExportOutcome {
            mode,
            dry_run: self.config.dry_run,
            artifacts,
            bundle_dir: None,
            archive: None,
            ledger,
            report,
        }
    }
}
