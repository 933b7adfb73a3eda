//! Content rewriting.
//!
//! Points image references at their downloaded copies. References whose
//! download failed, or that were never attempted, keep their remote URL so
//! a failed download never turns into a dangling local path.

use crate::images::extract::IMAGE_REFERENCE;
use crate::model::{ImageMap, Post};

use regex::Captures;

/// Return a copy of `post` with image references localized.
///
/// - `coverImageLocalPath` is set when the cover URL was downloaded.
/// - Inline `![alt](url)` references with a downloaded URL are rewritten,
///   keeping alt text and title.
/// - `localImagePaths` lists the distinct local paths of localized inline
///   images in order of appearance. It is left unset when none was.
pub fn rewrite_post(post: &Post, map: &ImageMap) -> Post {
    let mut rewritten = post.clone();

    rewritten.cover_image_local_path = post
        .cover_url()
        .and_then(|url| map.get(&post.id, url))
        .map(String::from);

    let mut local_paths: Vec<String> = Vec::new();
    if let Some(content) = post.content.as_deref() {
        let replaced = IMAGE_REFERENCE.replace_all(content, |caps: &Captures| {
            match map.get(&post.id, &caps[2]) {
                Some(local) => {
                    if !local_paths.iter().any(|p| p == local) {
                        local_paths.push(local.to_string());
                    }
                    format!("{}{}{}", &caps[1], local, &caps[3])
                }
                None => caps[0].to_string(),
            }
        });
        rewritten.content = Some(replaced.into_owned());
    }

    rewritten.local_image_paths = if local_paths.is_empty() {
        None
    } else {
        Some(local_paths)
    };

    rewritten
}

/// Return a copy of an already rewritten `post` whose local image paths
/// start with `prefix`.
///
/// Used for documents stored below the output root, so that their local
/// references still resolve. Remote references are left alone.
pub fn relocate_post(post: &Post, prefix: &str) -> Post {
    let mut relocated = post.clone();
    let is_local = |url: &str| {
        post.cover_image_local_path() == Some(url)
            || post.local_image_paths().iter().any(|p| p == url)
    };

    if let Some(content) = post.content.as_deref() {
        let replaced = IMAGE_REFERENCE.replace_all(content, |caps: &Captures| {
            if is_local(&caps[2]) {
                format!("{}{}{}{}", &caps[1], prefix, &caps[2], &caps[3])
            } else {
                caps[0].to_string()
            }
        });
        relocated.content = Some(replaced.into_owned());
    }
    relocated.cover_image_local_path = post
        .cover_image_local_path()
        .map(|path| format!("{}{}", prefix, path));
    relocated.local_image_paths = post
        .local_image_paths
        .as_ref()
        .map(|paths| paths.iter().map(|path| format!("{}{}", prefix, path)).collect());

    relocated
}

/// [`rewrite_post`] over a collection.
pub fn rewrite_posts(posts: &[Post], map: &ImageMap) -> Vec<Post> {
    posts.iter().map(|post| rewrite_post(post, map)).collect()
}
