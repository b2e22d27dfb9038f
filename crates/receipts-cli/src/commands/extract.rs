//! Extract command - run field extraction on a single file without storing it.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use receipts_core::ingest::extract_file;
use receipts_core::{ExtractedRecord, ReceiptExtractor};

use super::{read_upload, GlobalOpts, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (image, PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: ExtractArgs, opts: &GlobalOpts) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = opts.load_config()?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let file = read_upload(&args.input)?;
    let extractor = ReceiptExtractor::from_config(&config);
    let record = extract_file(&extractor, &file)?;

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &ExtractedRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_record_csv(record),
        OutputFormat::Text => Ok(format_record_text(record)),
    }
}

fn format_record_csv(record: &ExtractedRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["vendor", "date", "amount", "category"])?;
    wtr.write_record([
        record.vendor.as_str(),
        &record.date.map(|d| d.to_string()).unwrap_or_default(),
        &record.amount.to_string(),
        record.category.label(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_record_text(record: &ExtractedRecord) -> String {
    let date = record
        .date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    format!(
        "Vendor:   {}\nDate:     {}\nAmount:   {}\nCategory: {}",
        record.vendor, date, record.amount, record.category
    )
}
