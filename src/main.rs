use blogport::api::{read_posts_file, Credentials, PostClient};
use blogport::export::{ExportFormat, ExportMode, ExportOutcome, ExporterBuilder};
use blogport::progress::ProgressBarOpts;
use blogport::{Post, PostStatus};

use clap::Parser;
use color_eyre::eyre::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use console::style;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Export blog posts to Markdown, JSON and CSV with localized images.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Credentials file (TOML).
    #[arg(short, long, default_value = "blogport.toml")]
    config: PathBuf,

    /// Read posts from a JSON file instead of the API.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long, default_value = "export")]
    output: PathBuf,

    /// Prefix of flat export files.
    #[arg(long, default_value = "blog-export")]
    base_name: String,

    /// json, markdown, csv or all. Bundles always contain every format.
    #[arg(short, long, default_value = "all")]
    format: ExportFormat,

    /// Leave post bodies out of Markdown and CSV.
    #[arg(long)]
    no_content: bool,

    /// Do not embed cover images in Markdown.
    #[arg(long)]
    no_images: bool,

    /// Download referenced images and point the export at local copies.
    #[arg(long)]
    download_images: bool,

    /// Produce a bundle directory instead of flat files.
    #[arg(long)]
    bundle: bool,

    /// Keep the bundle as a directory instead of a ZIP archive.
    #[arg(long)]
    no_zip: bool,

    /// Customer label for reports.
    #[arg(long)]
    customer: Option<String>,

    /// Bundle title.
    #[arg(long, default_value = "Blog Export")]
    title: String,

    /// Concurrent image downloads.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,

    /// Attempts per image.
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Deadline of one image download attempt, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,

    /// List what would be written without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

async fn load_posts(cli: &Cli) -> Result<Vec<Post>> {
    if let Some(input) = &cli.input {
        eprintln!(
            "{} posts from {}",
            style("Reading").cyan().bold(),
            input.display()
        );
        return Ok(read_posts_file(input)?);
    }

    let credentials = Credentials::load(&cli.config)?;
    eprintln!(
        "{} posts from {}",
        style("Fetching").cyan().bold(),
        credentials.api_url
    );
    match PostClient::new(&credentials)?.fetch_all().await {
        Ok(posts) => Ok(posts),
        Err(e) => {
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("hint:").yellow().bold(), hint);
            }
            Err(e.into())
        }
    }
}

fn summary_table(outcome: &ExportOutcome) -> Table {
    let report = &outcome.report;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "Count"]);
    table.add_row(vec!["Posts".to_string(), report.total_posts.to_string()]);
    for status in PostStatus::ALL {
        table.add_row(vec![
            format!("  {}", status.label()),
            report.posts_by_status.get(status).to_string(),
        ]);
    }
    if report.images.attempted > 0 {
        table.add_row(vec![
            "Images downloaded".to_string(),
            format!(
                "{}/{} ({:.1}%)",
                report.images.downloaded, report.images.attempted, report.images.success_rate
            ),
        ]);
    }
    table
}

fn print_outcome(outcome: &ExportOutcome) {
    let verb = if outcome.dry_run {
        "Would write"
    } else {
        "Wrote"
    };
    for artifact in &outcome.artifacts {
        println!("{} {}", style(verb).green().bold(), artifact.display());
    }
    if let Some(archive) = &outcome.archive {
        println!(
            "{} {} ({} bytes)",
            style("Archived").green().bold(),
            archive.path.display(),
            archive.size
        );
    }
    if outcome.mode == ExportMode::Bundle {
        if let Some(dir) = &outcome.bundle_dir {
            println!("{} {}", style("Bundle").green().bold(), dir.display());
        }
    }

    println!("{}", summary_table(outcome));

    let failed = outcome.report.images.failed;
    if failed > 0 {
        eprintln!(
            "{} {} images could not be downloaded and keep their remote URL",
            style("warning:").yellow().bold(),
            failed
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exporter = ExporterBuilder::new()
        .output_dir(cli.output.clone())
        .base_name(cli.base_name.clone())
        .format(cli.format)
        .include_content(!cli.no_content)
        .include_images(!cli.no_images)
        .download_images(cli.download_images)
        .bundle(cli.bundle)
        .zip(!cli.no_zip)
        .customer(cli.customer.clone())
        .bundle_title(cli.title.clone())
        .concurrent_downloads(cli.concurrency)
        .retries(cli.retries)
        .timeout(Duration::from_millis(cli.timeout_ms))
        .progress(if cli.verbose {
            ProgressBarOpts::hidden()
        } else {
            ProgressBarOpts::default()
        })
        .dry_run(cli.dry_run)
        .build()?;

    let posts = load_posts(&cli).await?;
    if posts.is_empty() {
        eprintln!("{} no posts found", style("warning:").yellow().bold());
    }

    let outcome = exporter.export(&posts, chrono::Utc::now()).await?;

    print_outcome(&outcome);
    Ok(())
}
