//! Examharvest main entry point
//!
//! This is the command-line interface for the exam-question harvester.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use examharvest::config::{load_config_with_hash, Config};
use examharvest::fetch::{Pipeline, ProgressObserver, RunOptions};
use examharvest::output::{
    format_document, print_run_report, save_links, write_document, DocumentMeta, OutputFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

/// Examharvest: download exam questions into a document
///
/// Harvests question discussions for a provider from the discussion site
/// (or its snapshot cache), deduplicates and orders them, and writes a
/// markdown, HTML or plain-text document.
#[derive(Parser, Debug)]
#[command(name = "examharvest")]
#[command(version = "1.0.0")]
#[command(about = "Download exam questions into a document", long_about = None)]
struct Cli {
    /// Name of the exam provider
    #[arg(short, long, default_value = "google")]
    provider: String,

    /// String to search for in discussion links (empty matches everything)
    #[arg(short = 's', long = "search", default_value = "")]
    search: String,

    /// Path of the output document
    #[arg(short, long, default_value = "exam.md")]
    output: PathBuf,

    /// Output format: md, html or text
    #[arg(long, default_value = "md")]
    format: String,

    /// Include all comment/discussion text per question
    #[arg(short = 'c', long)]
    comments: bool,

    /// Show the possible exams for the selected provider and exit
    #[arg(long)]
    exams: bool,

    /// Save the unique question links next to the document
    #[arg(long = "save-links")]
    save_links: bool,

    /// Disable the snapshot-cache probe and always scrape live
    #[arg(long = "no-cache")]
    no_cache: bool,

    /// Auth token passed through to the cache backend
    #[arg(short = 't', long)]
    token: Option<String>,

    /// Path to an optional TOML configuration file for tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let format: OutputFormat = cli
        .format
        .parse()
        .with_context(|| format!("unsupported output format '{}'", cli.format))?;

    // Tuning comes from the optional config file; defaults otherwise
    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("configuration loaded (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let pipeline = Pipeline::new(config).context("failed to initialize pipeline")?;

    if cli.exams {
        let exams = pipeline.list_exams(&cli.provider).await?;
        println!("Exams for provider '{}'\n", cli.provider);
        for exam in exams {
            println!("{}", exam);
        }
        return Ok(());
    }

    if cli.search.is_empty() {
        tracing::warn!("running without a search string; all questions will be harvested");
    }

    let options = RunOptions {
        provider: cli.provider.clone(),
        filter: cli.search.clone(),
        use_cache: !cli.no_cache,
        token: cli.token.clone(),
    };

    let observer = std::sync::Arc::new(BarObserver::new(cli.quiet));
    let (records, report) = pipeline.run(&options, observer).await?;

    if records.is_empty() {
        // An empty harvest is a legitimate outcome; say so and still write
        // the (empty) document.
        tracing::warn!("harvest produced zero questions");
    }

    if cli.save_links {
        let links_path = PathBuf::from("saved-links.txt");
        save_links(&links_path, &records)?;
        println!("Saved {} links to {}", records.len(), links_path.display());
    }

    let meta = DocumentMeta {
        provider: cli.provider.clone(),
        exam_code: cli.search.clone(),
        include_comments: cli.comments,
        generated_at: report.finished_at,
    };
    let markdown = format_document(&records, &meta);
    let written = write_document(&markdown, &cli.output, format)?;

    if !cli.quiet {
        print_run_report(&report);
        println!("Output file:  {}", written.display());
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("examharvest=info,warn"),
            1 => EnvFilter::new("examharvest=debug,info"),
            2 => EnvFilter::new("examharvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Progress-bar observer for the two pipeline stages
///
/// Purely a spectator: the pool reports completions and this renders them.
struct BarObserver {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl BarObserver {
    fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }
}

impl ProgressObserver for BarObserver {
    fn stage_started(&self, stage: &str, total: usize) {
        if self.quiet {
            return;
        }

        let label = match stage {
            "discovery" => "Scanning pages",
            "fetch" => "Downloading questions",
            other => other,
        };

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg:>22} [{bar:40.green}] {pos}/{len} ({per_sec})")
                .expect("static progress template")
                .progress_chars("=>_"),
        );
        bar.set_message(label.to_string());

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn item_completed(&self) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.inc(1);
            }
        }
    }

    fn stage_finished(&self) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish();
            }
        }
    }
}
