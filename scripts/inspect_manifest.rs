//! Prints the shape of the gallery manifest for debugging.

mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gallery_manifest::{default_manifest_path, summarize, Manifest, ManifestError};

#[derive(Debug, Parser)]
#[command(author, version, about = "Summarize the spaces and events in the gallery manifest")]
struct Args {
    #[arg(long, value_name = "FILE", default_value_os_t = default_manifest_path())]
    manifest: PathBuf,

    /// Emit the summary as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn run(args: Args) -> Result<()> {
    let manifest = match Manifest::load(&args.manifest) {
        Ok(manifest) => manifest,
        Err(ManifestError::NotFound(path)) => {
            println!("{} not found", path.display());
            return Ok(());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("reading {}", args.manifest.display()))
        }
    };

    let summary = summarize(&manifest);
    if args.json {
        let encoded =
            serde_json::to_string_pretty(&summary).context("serialising manifest summary")?;
        println!("{encoded}");
    } else {
        print!("{summary}");
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
