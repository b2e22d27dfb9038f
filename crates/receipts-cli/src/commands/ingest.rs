//! Ingest command - extract receipts from files and store them.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use receipts_core::ingest::{commit_record, extract_file, IngestOutcome};
use receipts_core::{ExtractedRecord, ReceiptExtractor};

use super::{read_upload, GlobalOpts};

/// Arguments for the ingest command.
#[derive(Args)]
pub struct IngestArgs {
    /// Input files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Number of parallel extraction workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Extraction result for one file, before it is stored.
struct Extracted {
    path: PathBuf,
    result: anyhow::Result<(String, ExtractedRecord)>,
}

enum FileStatus {
    Stored(IngestOutcome),
    Failed(String),
}

pub async fn run(args: IngestArgs, opts: &GlobalOpts) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = opts.load_config()?;
    let store = opts.open_store(&config)?;

    let files = expand_inputs(&args.inputs)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.inputs.join(" "));
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let extractor = Arc::new(ReceiptExtractor::from_config(&config));
    debug!("Extractor ready: {:?}", extractor);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    // Extraction runs on the blocking pool; results come back in input order
    // and are stored one at a time on this task.
    let mut extracted = stream::iter(files)
        .map(|path| {
            let extractor = Arc::clone(&extractor);
            async move {
                let result = tokio::task::spawn_blocking({
                    let path = path.clone();
                    move || -> anyhow::Result<(String, ExtractedRecord)> {
                        let file = read_upload(&path)?;
                        let record = extract_file(&extractor, &file)?;
                        Ok((file.filename, record))
                    }
                })
                .await
                .unwrap_or_else(|e| Err(anyhow::anyhow!("Extraction task failed: {}", e)));
                Extracted { path, result }
            }
        })
        .buffered(args.jobs.max(1));

    let today = Local::now().date_naive();
    let mut statuses = Vec::new();

    while let Some(Extracted { path, result }) = extracted.next().await {
        let status = result.and_then(|(filename, record)| {
            Ok(commit_record(&store, &filename, record, today)?)
        });

        match status {
            Ok(outcome) => statuses.push((path, FileStatus::Stored(outcome))),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    statuses.push((path, FileStatus::Failed(error_msg)));
                } else {
                    pb.finish_and_clear();
                    print_statuses(&statuses);
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();
    print_statuses(&statuses);

    let stored = statuses
        .iter()
        .filter(|(_, s)| matches!(s, FileStatus::Stored(o) if o.inserted))
        .count();
    let duplicates = statuses
        .iter()
        .filter(|(_, s)| matches!(s, FileStatus::Stored(o) if !o.inserted))
        .count();
    let failed = statuses.len() - stored - duplicates;

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        statuses.len(),
        start.elapsed()
    );
    println!(
        "   {} stored, {} duplicates, {} failed",
        style(stored).green(),
        style(duplicates).yellow(),
        style(failed).red()
    );

    Ok(())
}

/// Expand glob patterns into a de-duplicated list of files, preserving order.
fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();

    for input in inputs {
        for path in glob(input)?.filter_map(|r| r.ok()) {
            if path.is_file() && !files.contains(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

fn print_statuses(statuses: &[(PathBuf, FileStatus)]) {
    for (path, status) in statuses {
        match status {
            FileStatus::Stored(outcome) => {
                let mark = if outcome.inserted {
                    style("✓").green()
                } else {
                    style("•").yellow()
                };
                println!("{} {}", mark, outcome.message());
                for warning in &outcome.warnings {
                    println!("  {} {}", style("⚠").yellow(), warning);
                }
            }
            FileStatus::Failed(error_msg) => {
                println!("{} {}: {}", style("✗").red(), path.display(), error_msg);
            }
        }
    }
}
