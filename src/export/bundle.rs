//! Fixed directory layout of an export bundle.

use crate::model::{unique_file_stems, Post};

use std::path::{Path, PathBuf};
use tokio::fs;

pub const POSTS_JSON: &str = "posts.json";
pub const POSTS_CSV: &str = "posts.csv";
pub const SUMMARY_JSON: &str = "summary.json";
pub const SUMMARY_MARKDOWN: &str = "summary.md";
pub const DELIVERY_README: &str = "README-DELIVERY.md";

/// Path from `posts/markdown/` back to the bundle root.
pub const MARKDOWN_TO_ROOT: &str = "../../";

/// Paths of a bundle rooted at `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleStructure {
    pub root: PathBuf,
    pub posts_markdown: PathBuf,
    pub posts_csv: PathBuf,
    pub posts_json: PathBuf,
    pub images: PathBuf,
    pub reports: PathBuf,
}

impl BundleStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let posts = root.join("posts");
        Self {
            posts_markdown: posts.join("markdown"),
            posts_csv: posts.join("csv"),
            posts_json: posts.join("json"),
            images: root.join("images"),
            reports: root.join("reports"),
            root,
        }
    }

    /// Create every directory of the layout.
    pub async fn create(&self) -> std::io::Result<()> {
        for dir in self.directories() {
            fs::create_dir_all(dir).await?;
        }
        Ok(())
    }

    pub fn directories(&self) -> [&Path; 5] {
        [
            &self.posts_markdown,
            &self.posts_csv,
            &self.posts_json,
            &self.images,
            &self.reports,
        ]
    }

    pub fn posts_json_file(&self) -> PathBuf {
        self.posts_json.join(POSTS_JSON)
    }

    pub fn posts_csv_file(&self) -> PathBuf {
        self.posts_csv.join(POSTS_CSV)
    }

    pub fn summary_json_file(&self) -> PathBuf {
        self.reports.join(SUMMARY_JSON)
    }

    pub fn summary_markdown_file(&self) -> PathBuf {
        self.reports.join(SUMMARY_MARKDOWN)
    }

    pub fn readme_file(&self) -> PathBuf {
        self.root.join(DELIVERY_README)
    }
}

/// File names for per-post Markdown, in post order.
///
/// Colliding slugs get the same `-2`, `-3` suffixes as the image folders.
pub fn markdown_file_names(posts: &[Post]) -> Vec<String> {
    unique_file_stems(posts)
        .into_iter()
        .map(|stem| format!("{}.md", stem))
        .collect()
}
