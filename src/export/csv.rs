//! CSV rendering.
//!
//! Every field is quoted and embedded quotes are doubled. Line breaks are
//! written as the two characters `\n` so each post stays on one row.

use crate::model::Post;

use chrono::{DateTime, SecondsFormat, Utc};

const COLUMNS: &[&str] = &[
    "id",
    "slug",
    "title",
    "status",
    "publishedAt",
    "updatedAt",
    "featured",
    "url",
    "tags",
    "categories",
    "readingTime",
    "coverImageUrl",
    "coverImageLocalPath",
    "contentLength",
    "excerptLength",
];

const CONTENT_COLUMN: &str = "content";

/// Quote a single field.
pub fn escape_field(value: &str) -> String {
    let flattened = value
        .replace("\r\n", "\\n")
        .replace(['\n', '\r'], "\\n");
    format!("\"{}\"", flattened.replace('"', "\"\""))
}

fn timestamp(at: Option<&DateTime<Utc>>) -> String {
    at.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

fn row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Header row.
pub fn header(include_content: bool) -> String {
    let mut names: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
    if include_content {
        names.push(CONTENT_COLUMN.to_string());
    }
    row(&names)
}

/// Data row for one post.
pub fn post_row(post: &Post, include_content: bool) -> String {
    let content = post.content.as_deref().unwrap_or_default();
    let excerpt = post.excerpt.as_deref().unwrap_or_default();

    let mut fields = vec![
        post.id.clone(),
        post.slug.clone(),
        post.title.clone(),
        post.effective_status().label().to_string(),
        timestamp(post.published_at.as_ref()),
        timestamp(post.updated_at.as_ref()),
        post.featured.to_string(),
        post.url.clone().unwrap_or_default(),
        post.tags.join("|"),
        post.category_ids.join("|"),
        post.reading_time.map(|m| m.to_string()).unwrap_or_default(),
        post.cover_url().unwrap_or_default().to_string(),
        post.cover_image_local_path().unwrap_or_default().to_string(),
        content.chars().count().to_string(),
        excerpt.chars().count().to_string(),
    ];
    if include_content {
        fields.push(content.to_string());
    }
    row(&fields)
}

/// Header followed by one row per post, newline terminated.
pub fn render_csv(posts: &[Post], include_content: bool) -> String {
    let mut lines = Vec::with_capacity(posts.len() + 1);
    lines.push(header(include_content));
    lines.extend(posts.iter().map(|p| post_row(p, include_content)));
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
