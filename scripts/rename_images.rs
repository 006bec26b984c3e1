//! Normalizes the image filenames in the gallery directory.

mod telemetry;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use gallery_manifest::{apply_renames, plan_renames, ToolConfig, DEFAULT_ASSETS_ROOT};

#[derive(Debug, Parser)]
#[command(author, version, about = "Lowercase and hyphenate gallery image filenames")]
struct Args {
    /// Directory holding the gallery images.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_ASSETS_ROOT)]
    dir: PathBuf,

    /// TOML file overriding the built-in rename table.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the planned renames without touching the files.
    #[arg(long)]
    dry_run: bool,
}

fn run(args: Args) -> Result<()> {
    let config = ToolConfig::load_or_default(args.config.as_deref())
        .context("loading gallery tool configuration")?;
    let plans = plan_renames(&args.dir, &config.rename)
        .with_context(|| format!("planning renames in {}", args.dir.display()))?;

    if plans.is_empty() {
        println!("Nothing to rename in {}", args.dir.display());
        return Ok(());
    }
    if args.dry_run {
        for plan in &plans {
            println!("Would rename: {} -> {}", plan.from, plan.to);
        }
        return Ok(());
    }

    let summary = apply_renames(&args.dir, plans);
    for outcome in &summary.outcomes {
        println!("{outcome}");
    }
    if summary.failed() > 0 {
        bail!("{} rename(s) failed", summary.failed());
    }
    Ok(())
}

fn main() {
    telemetry::init();
    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
