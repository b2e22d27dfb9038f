//! List command - print stored receipts, newest first.

use clap::Args;

use receipts_core::StoredReceipt;

use super::{GlobalOpts, OutputFormat};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ListArgs, opts: &GlobalOpts) -> anyhow::Result<()> {
    let config = opts.load_config()?;
    let store = opts.open_store(&config)?;

    let receipts = store.all_receipts()?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipts)?),
        OutputFormat::Csv => print!("{}", format_receipts_csv(&receipts)?),
        OutputFormat::Text if receipts.is_empty() => println!("No receipts stored."),
        OutputFormat::Text => print!("{}", format_receipts_text(&receipts)),
    }

    Ok(())
}

fn format_receipts_csv(receipts: &[StoredReceipt]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["id", "vendor", "date", "amount", "category"])?;
    for receipt in receipts {
        wtr.write_record([
            receipt.id.to_string().as_str(),
            receipt.vendor.as_str(),
            &receipt.date.to_string(),
            &receipt.amount.to_string(),
            receipt.category.label(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_receipts_text(receipts: &[StoredReceipt]) -> String {
    let mut output = String::new();

    for receipt in receipts {
        output.push_str(&format!(
            "{:>5}  {}  {:<28} {:>12}  {}\n",
            receipt.id,
            receipt.date,
            receipt.vendor,
            receipt.amount.to_string(),
            receipt.category
        ));
    }

    output
}
