//! Report command - spending aggregates over stored receipts.

use clap::Args;
use rust_decimal::Decimal;

use receipts_core::SpendingReport;

use super::{GlobalOpts, OutputFormat};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ReportArgs, opts: &GlobalOpts) -> anyhow::Result<()> {
    let config = opts.load_config()?;
    let store = opts.open_store(&config)?;

    let report = SpendingReport::from_store(&store)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Csv => format_report_csv(&report)?,
        OutputFormat::Text => format_report_text(&report),
    };

    println!("{}", output);

    Ok(())
}

/// One `section,key,value` row per figure.
fn format_report_csv(report: &SpendingReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["section", "key", "value"])?;
    wtr.write_record(["summary", "receipt_count", &report.receipt_count.to_string()])?;
    wtr.write_record(["summary", "total_spend", &report.total_spend.to_string()])?;
    wtr.write_record([
        "summary",
        "average_per_receipt",
        &report.average_per_receipt.map(|a| a.to_string()).unwrap_or_default(),
    ])?;
    wtr.write_record([
        "summary",
        "top_vendor",
        report.top_vendor.as_deref().unwrap_or(""),
    ])?;

    for (month, amount) in &report.monthly {
        wtr.write_record(["month", month.as_str(), &amount.to_string()])?;
    }
    for (category, amount) in &report.by_category {
        wtr.write_record(["category", category.label(), &amount.to_string()])?;
    }
    for (vendor, amount) in &report.by_vendor {
        wtr.write_record(["vendor", vendor.as_str(), &amount.to_string()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_report_text(report: &SpendingReport) -> String {
    let mut output = String::new();

    output.push_str(&format!("Receipts:        {}\n", report.receipt_count));
    output.push_str(&format!("Total spend:     {}\n", report.total_spend));
    output.push_str(&format!(
        "Average/receipt: {}\n",
        report
            .average_per_receipt
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    output.push_str(&format!(
        "Top vendor:      {}\n",
        report.top_vendor.as_deref().unwrap_or("-")
    ));

    push_breakdown(&mut output, "By month", report.monthly.iter().map(|(k, v)| (k.as_str(), *v)));
    push_breakdown(
        &mut output,
        "By category",
        report.by_category.iter().map(|(k, v)| (k.label(), *v)),
    );
    push_breakdown(
        &mut output,
        "By vendor",
        report.by_vendor.iter().map(|(k, v)| (k.as_str(), *v)),
    );

    output.trim_end().to_string()
}

fn push_breakdown<'a>(
    output: &mut String,
    title: &str,
    rows: impl Iterator<Item = (&'a str, Decimal)>,
) {
    let rows: Vec<_> = rows.collect();
    if rows.is_empty() {
        return;
    }

    output.push('\n');
    output.push_str(title);
    output.push_str(":\n");
    for (key, amount) in rows {
        output.push_str(&format!("  {:<24} {:>12}\n", key, amount.to_string()));
    }
}
