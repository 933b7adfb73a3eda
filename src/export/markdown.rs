//! Markdown rendering: one document per post, or a consolidated document
//! grouped by status.

use crate::model::{Post, PostStatus};

use chrono::{DateTime, Utc};
use std::fmt::Write;

/// What goes into rendered posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render the full content section.
    pub include_content: bool,
    /// Embed the cover image.
    pub include_images: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_content: true,
            include_images: true,
        }
    }
}

/// Long date used in rendered documents, e.g. `March 9, 2024`.
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y").to_string()
}

fn heading(level: usize, text: &str) -> String {
    format!("{} {}", "#".repeat(level.clamp(1, 6)), text)
}

fn hashtag(tag: &str) -> String {
    let compact: String = tag.split_whitespace().collect::<Vec<_>>().join("");
    format!("#{}", compact)
}

/// Render a single post with its title at `level`.
pub fn render_post(post: &Post, opts: &RenderOptions, level: usize) -> String {
    let mut out = String::new();
    let title = if post.title.trim().is_empty() {
        "Untitled"
    } else {
        post.title.as_str()
    };

    let _ = writeln!(out, "{}\n", heading(level, title));

    if let Some(url) = post.url.as_deref().filter(|u| !u.is_empty()) {
        let _ = writeln!(out, "- **URL:** {}", url);
    }
    let _ = writeln!(out, "- **Slug:** {}", post.slug);
    let _ = writeln!(out, "- **Status:** {}", post.effective_status());

    let published = post.published_at.as_ref().map(format_date);
    if let Some(published) = &published {
        let _ = writeln!(out, "- **Published:** {}", published);
    }
    if let Some(updated) = post.updated_at.as_ref().map(format_date) {
        if published.as_ref() != Some(&updated) {
            let _ = writeln!(out, "- **Updated:** {}", updated);
        }
    }
    if let Some(minutes) = post.reading_time {
        let _ = writeln!(out, "- **Reading Time:** {} min", minutes);
    }
    if post.featured {
        let _ = writeln!(out, "- **Featured:** ⭐ Yes");
    }
    if !post.tags.is_empty() {
        let tags: Vec<String> = post.tags.iter().map(|t| hashtag(t)).collect();
        let _ = writeln!(out, "- **Tags:** {}", tags.join(" "));
    }
    if !post.category_ids.is_empty() {
        let _ = writeln!(out, "- **Categories:** {}", post.category_ids.join(", "));
    }

    if opts.include_images {
        let cover = post.cover_image_local_path().or_else(|| post.cover_url());
        if let Some(cover) = cover {
            let _ = writeln!(out, "\n![Cover image]({})", cover);
        }
    }

    if let Some(excerpt) = post.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
        let _ = writeln!(out, "\n{}\n\n{}", heading(level + 1, "Excerpt"), excerpt.trim());
    }

    if opts.include_content {
        if let Some(content) = post.content.as_deref().filter(|c| !c.trim().is_empty()) {
            let _ = writeln!(out, "\n{}\n\n{}", heading(level + 1, "Content"), content.trim());
        }
    }

    out
}

/// Render every post in one document, grouped by status in the order
/// Published, Draft, Scheduled. Empty groups are left out.
pub fn render_document(
    posts: &[Post],
    opts: &RenderOptions,
    title: &str,
    generated_at: &DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", title);
    let _ = writeln!(
        out,
        "_Exported on {} · {} posts_",
        format_date(generated_at),
        posts.len()
    );

    for status in PostStatus::ALL {
        let group: Vec<&Post> = posts
            .iter()
            .filter(|p| p.effective_status() == status)
            .collect();
        if group.is_empty() {
            continue;
        }

        let _ = writeln!(out, "\n## {} Posts ({})", status.label(), group.len());
        for (i, post) in group.iter().enumerate() {
            if i > 0 {
                let _ = writeln!(out, "\n---");
            }
            let _ = write!(out, "\n{}", render_post(post, opts, 3));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CoverImage;
    use chrono::TimeZone;

    fn sample() -> Post {
        Post {
            id: "1".into(),
            title: "Hello".into(),
            slug: "hello".into(),
            url: Some("https://blog.example.com/hello".into()),
            excerpt: Some("Short".into()),
            content: Some("Body text".into()),
            tags: vec!["test".into(), "open source".into()],
            category_ids: vec!["c1".into(), "c2".into()],
            reading_time: Some(4),
            featured: true,
            cover_image: Some(CoverImage::new("https://x.io/cover.png")),
            published_at: Some(Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2024, 3, 9, 18, 0, 0).unwrap()),
            ..Post::default()
        }
    }

    #[test]
    fn test_render_post_fields() {
        let md = render_post(&sample(), &RenderOptions::default(), 1);
        assert!(md.starts_with("# Hello\n"));
        assert!(md.contains("- **URL:** https://blog.example.com/hello"));
        assert!(md.contains("- **Status:** Published"));
        assert!(md.contains("- **Published:** March 9, 2024"));
        assert!(!md.contains("**Updated:**"));
        assert!(md.contains("- **Reading Time:** 4 min"));
        assert!(md.contains("- **Featured:**"));
        assert!(md.contains("- **Tags:** #test #opensource"));
        assert!(md.contains("- **Categories:** c1, c2"));
        assert!(md.contains("![Cover image](https://x.io/cover.png)"));
        assert!(md.contains("## Excerpt\n\nShort"));
        assert!(md.contains("## Content\n\nBody text"));
    }

    #[test]
    fn test_render_post_options() {
        let mut post = sample();
        post.updated_at = Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());
        post.cover_image_local_path = Some("images/hello/cover-abcdef12.png".into());

        let opts = RenderOptions {
            include_content: false,
            include_images: true,
        };
        let md = render_post(&post, &opts, 2);
        assert!(md.starts_with("## Hello\n"));
        assert!(md.contains("- **Updated:** April 1, 2024"));
        assert!(md.contains("![Cover image](images/hello/cover-abcdef12.png)"));
        assert!(md.contains("### Excerpt"));
        assert!(!md.contains("Content"));

        let opts = RenderOptions {
            include_content: true,
            include_images: false,
        };
        assert!(!render_post(&post, &opts, 1).contains("![Cover image]"));
    }

    #[test]
    fn test_render_document_groups_by_status() {
        let draft = Post {
            id: "2".into(),
            title: "Draft one".into(),
            status: Some(PostStatus::Draft),
            ..Post::default()
        };
        let no_status = Post {
            id: "3".into(),
            title: "Implicitly published".into(),
            ..Post::default()
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let md = render_document(
            &[draft, sample(), no_status],
            &RenderOptions::default(),
            "Blog Export",
            &at,
        );

        let published = md.find("## Published Posts (2)").unwrap();
        let drafts = md.find("## Draft Posts (1)").unwrap();
        assert!(published < drafts);
        assert!(!md.contains("Scheduled Posts"));
        assert!(md.contains("### Hello"));
        assert!(md.contains("### Implicitly published"));
        assert!(md.contains("_Exported on May 1, 2024 · 3 posts_"));
    }
}
