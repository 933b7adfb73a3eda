//! The [`Post`] record and its status.
//!
//! Posts are deserialized from the content API as-is. Fields blogport does
//! not know about are kept in an order-preserving bag and written back
//! unchanged, so a JSON export never silently drops upstream data.

use crate::utils::sanitize_filename;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Publication status of a post.
///
/// Upstream systems disagree on casing, so `PUBLISHED` and `published` are
/// both accepted. Exports always use the lower-case form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    #[serde(alias = "PUBLISHED", alias = "Published")]
    Published,
    #[serde(alias = "DRAFT", alias = "Draft")]
    Draft,
    #[serde(alias = "SCHEDULED", alias = "Scheduled")]
    Scheduled,
}

impl PostStatus {
    /// Section order used when grouping posts by status.
    pub const ALL: [PostStatus; 3] = [
        PostStatus::Published,
        PostStatus::Draft,
        PostStatus::Scheduled,
    ];

    /// Human readable label, e.g. `Published`.
    pub fn label(&self) -> &'static str {
        match self {
            PostStatus::Published => "Published",
            PostStatus::Draft => "Draft",
            PostStatus::Scheduled => "Scheduled",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Cover image reference: the URL plus whatever metadata upstream attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverImage {
    pub url: String,
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl CoverImage {
    /// A cover image without metadata.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            metadata: Map::new(),
        }
    }
}

/// One blog entry fetched from the remote source.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    /// Markdown body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<CoverImage>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_post_ids: Vec<String>,
    /// Canonical URL of the published post.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Estimated reading time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) cover_image_local_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) local_image_paths: Option<Vec<String>>,

    /// Upstream fields without a typed counterpart.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Post {
    /// Status used for grouping and counting: a missing status means
    /// Published, everywhere.
    pub fn effective_status(&self) -> PostStatus {
        self.status.unwrap_or_default()
    }

    /// Local path of the cover image, set by the content rewriter.
    pub fn cover_image_local_path(&self) -> Option<&str> {
        self.cover_image_local_path.as_deref()
    }

    /// Local paths of inline images, set by the content rewriter.
    pub fn local_image_paths(&self) -> &[String] {
        self.local_image_paths.as_deref().unwrap_or_default()
    }

    /// Drop any local-path augmentation, e.g. on records coming from the API.
    pub fn clear_local_paths(&mut self) {
        self.cover_image_local_path = None;
        self.local_image_paths = None;
    }

    /// The cover image URL, if any.
    pub fn cover_url(&self) -> Option<&str> {
        self.cover_image.as_ref().map(|c| c.url.as_str())
    }

    /// Name used for this post's files and image folder.
    pub fn file_stem(&self) -> String {
        if self.slug.trim().is_empty() {
            sanitize_filename(&self.id)
        } else {
            sanitize_filename(&self.slug)
        }
    }
}

/// File stems for a post collection, in post order.
///
/// Stems come from [`Post::file_stem`]; a repeated stem gets `-2`, `-3`, ...
/// so no two posts share a Markdown file or an image folder.
pub fn unique_file_stems(posts: &[Post]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut stems = Vec::with_capacity(posts.len());
    for post in posts {
        let stem = post.file_stem();
        let mut candidate = stem.clone();
        let mut n = seen.get(&stem).copied().unwrap_or(0);
        while seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{}-{}", stem, n + 1);
        }
        seen.insert(stem, n);
        seen.insert(candidate.clone(), 0);
        stems.push(candidate);
    }
    stems
}
