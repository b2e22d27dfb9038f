//! Clear command - delete every stored receipt.

use clap::Args;
use console::style;

use super::GlobalOpts;

/// Arguments for the clear command.
#[derive(Args)]
pub struct ClearArgs {
    /// Confirm deletion of all receipts
    #[arg(long)]
    yes: bool,
}

pub async fn run(args: ClearArgs, opts: &GlobalOpts) -> anyhow::Result<()> {
    if !args.yes {
        anyhow::bail!("Refusing to delete all receipts without --yes");
    }

    let config = opts.load_config()?;
    let store = opts.open_store(&config)?;

    let deleted = store.delete_all()?;

    println!("{} Deleted {} receipts", style("✓").green(), deleted);

    Ok(())
}
