//! Image reference extraction.
//!
//! Turns a post collection into the list of [`ImageDownloadTask`]s for one
//! acquisition pass. Deduplication is per post: the cover URL and the inline
//! URLs of a post are merged (cover first) and each distinct URL becomes one
//! task, while the same URL used by two posts yields two tasks. Posts whose
//! slugs collide get suffixed folders, matching their Markdown file names.

use crate::model::{unique_file_stems, ImageDownloadTask, ImageRole, Post};
use crate::utils::parse_image_url;

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// Markdown image reference: `![alt](url)` or `![alt](url "title")`.
///
/// Groups: 1 = `![alt](`, 2 = url, 3 = optional title and closing paren.
pub(crate) static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!\[[^\]]*\]\()\s*([^)\s]+)((?:\s+"[^"]*")?\s*\))"#)
        .expect("image reference pattern is valid")
});

/// Inline image URLs of `content`, in order of appearance, without
/// duplicates and without `data:` URIs.
pub fn inline_image_urls(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    IMAGE_REFERENCE
        .captures_iter(content)
        .filter_map(|caps| caps.get(2))
        .map(|m| m.as_str())
        .filter(|url| !url.starts_with("data:"))
        .filter(|url| seen.insert(*url))
        .map(String::from)
        .collect()
}

/// Download tasks for a single post.
pub fn post_tasks(post: &Post) -> Vec<ImageDownloadTask> {
    tasks_in(post, post.file_stem())
}

fn tasks_in(post: &Post, post_dir: String) -> Vec<ImageDownloadTask> {
    let mut seen = HashSet::new();

    let cover = post
        .cover_url()
        .map(|url| (url.to_string(), ImageRole::Cover));
    let inline = post
        .content
        .as_deref()
        .map(inline_image_urls)
        .unwrap_or_default()
        .into_iter()
        .map(|url| (url, ImageRole::Inline));

    cover
        .into_iter()
        .chain(inline)
        .filter_map(|(original_url, role)| {
            if !seen.insert(original_url.clone()) {
                return None;
            }
            match parse_image_url(&original_url) {
                Some(url) => Some(ImageDownloadTask {
                    post_id: post.id.clone(),
                    post_dir: post_dir.clone(),
                    url,
                    original_url,
                    role,
                }),
                None => {
                    debug!(post = %post.id, url = %original_url, "Skipping invalid image URL");
                    None
                }
            }
        })
        .collect()
}

/// Download tasks for a whole collection.
pub fn collect_tasks(posts: &[Post]) -> Vec<ImageDownloadTask> {
    posts
        .iter()
        .zip(unique_file_stems(posts))
        .flat_map(|(post, post_dir)| tasks_in(post, post_dir))
        .collect()
}
