//! Narrative renderings of a [`SummaryReport`].

use super::summary::SummaryReport;
use crate::export::markdown::format_date;
use crate::model::PostStatus;

use std::fmt::Write;

/// Failed URLs listed by name in the delivery README.
pub const README_FAILURE_LIMIT: usize = 5;

/// Pretty JSON for `reports/summary.json`.
pub fn render_summary_json(report: &SummaryReport) -> crate::Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

/// Markdown for `reports/summary.md`.
pub fn render_summary_markdown(report: &SummaryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} - Export Summary\n", report.bundle_title);
    if let Some(customer) = &report.customer {
        let _ = writeln!(out, "- **Customer:** {}", customer);
    }
    let _ = writeln!(out, "- **Generated:** {}", format_date(&report.generated_at));
    let _ = writeln!(out, "- **Total posts:** {}", report.total_posts);

    let _ = writeln!(out, "\n## Posts by Status\n");
    let _ = writeln!(out, "| Status | Posts |\n|--------|-------|");
    for status in PostStatus::ALL {
        let _ = writeln!(
            out,
            "| {} | {} |",
            status.label(),
            report.posts_by_status.get(status)
        );
    }

    let images = &report.images;
    let _ = writeln!(out, "\n## Images\n");
    if images.attempted == 0 {
        let _ = writeln!(out, "No images were downloaded for this export.");
    } else {
        let _ = writeln!(
            out,
            "{} of {} images were downloaded ({:.1}% success rate).",
            images.downloaded, images.attempted, images.success_rate
        );
        if images.failed > 0 {
            let _ = writeln!(
                out,
                "{} images could not be downloaded and keep their original URL.",
                images.failed
            );
        }
    }

    if !report.top_tags.is_empty() {
        let _ = writeln!(out, "\n## Top Tags\n");
        for (rank, tag) in report.top_tags.iter().enumerate() {
            let _ = writeln!(out, "{}. {} ({})", rank + 1, tag.tag, tag.count);
        }
    }

    if !report.posts_by_year.is_empty() {
        let _ = writeln!(out, "\n## Posts by Year\n");
        for (year, count) in &report.posts_by_year {
            let _ = writeln!(out, "- {}: {}", year, count);
        }
    }

    if !report.failed_downloads.is_empty() {
        let _ = writeln!(out, "\n## Failed Downloads\n");
        for failure in &report.failed_downloads {
            let _ = writeln!(
                out,
                "- `{}` (post {}): {}",
                failure.url, failure.post_id, failure.error
            );
        }
    }

    out
}

/// Markdown for `README-DELIVERY.md` at the bundle root.
pub fn render_delivery_readme(report: &SummaryReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", report.bundle_title);
    match &report.customer {
        Some(customer) => {
            let _ = writeln!(
                out,
                "Blog export prepared for **{}** on {}.",
                customer,
                format_date(&report.generated_at)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "Blog export generated on {}.",
                format_date(&report.generated_at)
            );
        }
    }
    let _ = writeln!(
        out,
        "It contains {} posts ({} published, {} drafts, {} scheduled).",
        report.total_posts,
        report.posts_by_status.published,
        report.posts_by_status.draft,
        report.posts_by_status.scheduled
    );

    out.push_str(
        "
## Contents

| Path | Description |
|------|-------------|
| `posts/markdown/` | One Markdown file per post |
| `posts/json/posts.json` | Every post as structured JSON |
| `posts/csv/posts.csv` | Every post as one spreadsheet row |
| `images/` | Downloaded images, one folder per post |
| `reports/summary.json` | Export statistics |
| `reports/summary.md` | Readable export summary |

Image references in the JSON and CSV files are relative to the bundle root
and point into `images/` wherever the image was downloaded. The files in
`posts/markdown/` reference the same images through `../../images/`.

## Importing

### WordPress

Import `posts/json/posts.json` with a JSON import plugin, or paste the
Markdown files into the block editor. Upload the `images/` folder to the
media library first.

### Ghost

Convert `posts/json/posts.json` with the Ghost migration tools, or paste
each Markdown file into a new post. Upload images through the editor.

### Static site generators (Hugo, Jekyll, Astro)

Copy `posts/markdown/` into the content directory and `images/` into the
static assets directory, then replace the `../../images/` prefix with the
site's image path.

### Notion

Use *Import > Markdown* and select the files in `posts/markdown/`.

### Spreadsheets

Open `posts/csv/posts.csv` in Excel, Numbers or Google Sheets. Line breaks
inside content are written as `\\n`.
",
    );

    let failures = &report.failed_downloads;
    if !failures.is_empty() {
        let _ = writeln!(out, "\n## Failed Image Downloads\n");
        let _ = writeln!(
            out,
            "{} images could not be downloaded; their references still point to the original URL.\n",
            failures.len()
        );
        for failure in failures.iter().take(README_FAILURE_LIMIT) {
            let _ = writeln!(out, "- {}", failure.url);
        }
        if failures.len() > README_FAILURE_LIMIT {
            let _ = writeln!(
                out,
                "- ...and {} more (see `reports/summary.json`)",
                failures.len() - README_FAILURE_LIMIT
            );
        }
    }

    out
}
