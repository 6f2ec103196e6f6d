use std::{fs, path::PathBuf};

use anyhow::{Result, anyhow};
use clap::ArgMatches;
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use webhookgen::{downgrade::downgrade_manifest, generator::Generator, source::WebhookSource};

mod cli;

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    setup_tracing(matches.get_flag("verbose"), matches.get_flag("no-color"))?;

    match matches.subcommand() {
        Some(("generate", matches)) => generate(matches),
        Some(("downgrade", matches)) => downgrade(matches),
        Some((command, _)) => Err(anyhow!("unknown subcommand: {}", command)),
        None => {
            // NOTE: this should not happen due to the
            // subcommand_required setting
            unreachable!();
        }
    }
}

// Logs go to stderr, stdout is reserved to the manifests printed by
// `downgrade`.
fn setup_tracing(verbose: bool, no_color: bool) -> Result<()> {
    let level_filter = if verbose { "debug" } else { "info" };
    let filter_layer = EnvFilter::try_new(level_filter)
        .map_err(|e| anyhow!("cannot build log filter: {e}"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color),
        )
        .init();

    Ok(())
}

fn generate(matches: &ArgMatches) -> Result<()> {
    let source_path = matches
        .get_one::<String>("source")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing webhook source"))?;
    let output_dir = matches
        .get_one::<String>("output-dir")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing output directory"))?;
    let versions: Vec<&String> = matches
        .get_many::<String>("webhook-version")
        .map(|versions| versions.collect())
        .unwrap_or_default();

    let generator = Generator::new(&versions)?;
    let source = WebhookSource::from_path(&source_path)?;
    debug!(
        webhooks = source.webhooks.len(),
        source = %source_path.display(),
        "webhook source loaded"
    );

    generator.generate(&source, &output_dir)?;

    Ok(())
}

fn downgrade(matches: &ArgMatches) -> Result<()> {
    let manifest_path = matches
        .get_one::<String>("manifest")
        .ok_or_else(|| anyhow!("missing manifest"))?;
    let manifest = fs::read_to_string(manifest_path)
        .map_err(|e| anyhow!("cannot open {manifest_path}: {e}"))?;

    let downgraded = downgrade_manifest(&manifest)
        .map_err(|e| anyhow!("cannot downgrade {manifest_path}: {e}"))?;
    print!("{downgraded}");

    Ok(())
}
