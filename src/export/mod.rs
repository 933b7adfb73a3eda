//! Multi-format export.
//!
//! A flat export writes `<base>-<timestamp>.{json,md,csv}` next to each
//! other. A bundle export stages a directory tree:
//!
//! ```text
//! <title>-<timestamp>/
//! ├── README-DELIVERY.md
//! ├── images/<post>/...
//! ├── posts/csv/posts.csv
//! ├── posts/json/posts.json
//! ├── posts/markdown/<slug>.md
//! └── reports/summary.{json,md}
//! ```
//!
//! and optionally archives it into `<title>-<timestamp>.zip`.

pub mod builder;
pub mod bundle;
pub mod config;
pub mod csv;
pub mod exporter;
pub mod json;
pub mod markdown;

pub use builder::ExporterBuilder;
pub use bundle::{markdown_file_names, BundleStructure};
pub use config::{ExportConfig, ExportFormat};
pub use exporter::{ExportMode, ExportOutcome, Exporter};
