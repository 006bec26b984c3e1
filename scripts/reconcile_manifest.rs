//! Rewrites the image reference of every gallery space in `content.json`.
//!
//! Runs without arguments against `public/galerie/content.json` using the
//! built-in mapping; `--config` swaps in tables from a TOML file.

mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gallery_manifest::{default_manifest_path, reconcile_file, ManifestError, ToolConfig};

#[derive(Debug, Parser)]
#[command(author, version, about = "Point gallery space images at file-backed paths")]
struct Args {
    /// Manifest to rewrite in place.
    #[arg(long, value_name = "FILE", default_value_os_t = default_manifest_path())]
    manifest: PathBuf,

    /// TOML file overriding the built-in prefix, fallback and mapping table.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit without touching the manifest.
    #[arg(long)]
    print_config: bool,
}

fn run(args: Args) -> Result<()> {
    let config = ToolConfig::load_or_default(args.config.as_deref())
        .context("loading gallery tool configuration")?;
    if args.print_config {
        let encoded = config
            .to_toml_string()
            .context("serialising gallery tool configuration")?;
        print!("{encoded}");
        return Ok(());
    }

    match reconcile_file(&args.manifest, &config.reconcile) {
        Ok(report) => {
            for outcome in &report.outcomes {
                println!("{outcome}");
            }
            println!(
                "Successfully updated {} ({} of {} spaces changed)",
                args.manifest.display(),
                report.changed(),
                report.outcomes.len()
            );
            Ok(())
        }
        Err(ManifestError::NotFound(path)) => {
            println!("{} not found", path.display());
            Ok(())
        }
        Err(err) => {
            Err(err).with_context(|| format!("updating {}", args.manifest.display()))
        }
    }
}

fn main() {
    telemetry::init();
    if let Err(err) = run(Args::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
