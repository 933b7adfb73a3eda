//! Export reports: the [`SummaryReport`] aggregate and its JSON, Markdown
//! and delivery README renderings.

pub mod render;
pub mod summary;

pub use render::{render_delivery_readme, render_summary_json, render_summary_markdown};
pub use summary::{ImageStats, ReportMeta, StatusCounts, SummaryReport, TagCount};
