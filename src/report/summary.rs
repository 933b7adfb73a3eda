//! The [`SummaryReport`] aggregate.

use crate::model::{FailedDownload, Ledger, Post, PostStatus};

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

const TOP_TAGS: usize = 10;

/// Inputs of a report that do not come from the posts or the ledger.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub generated_at: DateTime<Utc>,
    pub customer: Option<String>,
    pub bundle_title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub published: usize,
    pub draft: usize,
    pub scheduled: usize,
}

impl StatusCounts {
    pub fn get(&self, status: PostStatus) -> usize {
        match status {
            PostStatus::Published => self.published,
            PostStatus::Draft => self.draft,
            PostStatus::Scheduled => self.scheduled,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStats {
    pub attempted: usize,
    pub downloaded: usize,
    pub failed: usize,
    /// Percentage of attempted images that were stored, one decimal.
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Aggregate statistics over one export.
///
/// Building a report twice from the same inputs yields the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    pub bundle_title: String,
    pub total_posts: usize,
    pub posts_by_status: StatusCounts,
    pub images: ImageStats,
    pub top_tags: Vec<TagCount>,
    pub posts_by_year: BTreeMap<i32, usize>,
    pub failed_downloads: Vec<FailedDownload>,
}

/// Success percentage rounded to one decimal; 0 when nothing was attempted.
pub fn success_rate(downloaded: usize, attempted: usize) -> f64 {
    if attempted == 0 {
        return 0.0;
    }
    let rate = downloaded as f64 * 100.0 / attempted as f64;
    (rate * 10.0).round() / 10.0
}

/// The most used tags, ties kept in order of first appearance.
pub fn top_tags(posts: &[Post], limit: usize) -> Vec<TagCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        let count = counts.entry(tag.as_str()).or_insert(0);
        if *count == 0 {
            order.push(tag.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<TagCount> = order
        .into_iter()
        .map(|tag| TagCount {
            tag: tag.to_string(),
            count: counts[tag],
        })
        .collect();
    // sort_by is stable, so equal counts keep first-appearance order.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

impl SummaryReport {
    pub fn build(posts: &[Post], ledger: &Ledger, meta: &ReportMeta) -> Self {
        let mut posts_by_status = StatusCounts::default();
        let mut posts_by_year = BTreeMap::new();
        for post in posts {
            match post.effective_status() {
                PostStatus::Published => posts_by_status.published += 1,
                PostStatus::Draft => posts_by_status.draft += 1,
                PostStatus::Scheduled => posts_by_status.scheduled += 1,
            }
            if let Some(published) = post.published_at {
                *posts_by_year.entry(published.year()).or_insert(0) += 1;
            }
        }

        let stats = ledger.stats();

        SummaryReport {
            generated_at: meta.generated_at,
            customer: meta.customer.clone(),
            bundle_title: meta.bundle_title.clone(),
            total_posts: posts.len(),
            posts_by_status,
            images: ImageStats {
                attempted: stats.attempted,
                downloaded: stats.downloaded,
                failed: stats.failed,
                success_rate: success_rate(stats.downloaded, stats.attempted),
            },
            top_tags: top_tags(posts, TOP_TAGS),
            posts_by_year,
            failed_downloads: stats.failures,
        }
    }
}
