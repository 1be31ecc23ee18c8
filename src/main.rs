use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::TuningArgs;
use crate::pipeline::{Classifier, Pipeline, Qualifier};
use crate::resolver::{resolve_phone, GooglePlacesClient};

mod config;
mod domain;
mod errors;
mod pipeline;
mod probe;
mod resolver;
mod sources;
mod spreadsheets;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(
    name = "listing_qualifier",
    about = "Sort business listings by the state of their website"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every listing in the CSV exports and write the buckets to a workbook
    Run {
        /// Input prefix; every `<prefix>*.csv` is read
        #[arg(short, long, env = "FILE_PATH")]
        input: String,
        /// Workbook to write (default: qualified_<timestamp>.xlsx)
        #[arg(short, long, env = "OUTPUT_PATH")]
        output: Option<PathBuf>,
        /// Look up every listing's website from its phone before classifying.
        /// `SNAP` is off for empty, 0, false, no, n or off and on for anything else
        #[arg(
            long,
            env = "SNAP",
            action = ArgAction::SetTrue,
            value_parser = FalseyValueParser::new()
        )]
        snap: bool,
        /// Places API key
        #[arg(long, env = "API_KEY", hide_env_values = true)]
        api_key: String,
        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Probe one website and print the verdict
    Check {
        url: String,
        #[command(flatten)]
        tuning: TuningArgs,
    },
    /// Print the place id and website found for a phone number
    Resolve {
        phone: String,
        /// Places API key
        #[arg(long, env = "API_KEY", hide_env_values = true)]
        api_key: String,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output,
            snap,
            api_key,
            tuning,
        } => {
            let config = tuning.to_run_config(snap);

            // credentials are checked before any work starts
            let resolver = Arc::new(GooglePlacesClient::new(api_key)?);
            let classifier = Classifier::from_config(&config)?;
            let pipeline = Pipeline::new(&config, Qualifier::new(resolver, classifier));

            info!("Loading files");
            let records = sources::read_all(&input)
                .with_context(|| format!("Could not load listings from {input}"))?;
            info!("Processing {} business records", records.len());

            let report = pipeline.run(records);

            for err in &report.errors {
                warn!("[{}] {}: {}", err.stage, err.name, err.cause);
            }
            info!(
                "Processed {} in {:.1}s: {} flagged, {} empty, {} review, {} lookup errors",
                report.processed,
                report.elapsed.as_secs_f64(),
                report.buckets.flagged.len(),
                report.buckets.empty.len(),
                report.buckets.review.len(),
                report.errors.len(),
            );

            let output = output.unwrap_or_else(default_output_path);
            spreadsheets::export_buckets_xlsx(&report.buckets, &output)
                .with_context(|| format!("Could not write {}", output.display()))?;
            info!("Wrote {}", output.display());
            Ok(())
        }
        Commands::Check { url, tuning } => {
            let classifier = Classifier::from_config(&tuning.to_run_config(false))?;
            println!("{url}: {}", classifier.classify(&url));
            Ok(())
        }
        Commands::Resolve { phone, api_key } => {
            let resolver = GooglePlacesClient::new(api_key)?;
            let resolution = resolve_phone(&resolver, &phone)?;
            println!(
                "place id: {}\nwebsite:  {}",
                resolution.place_id.as_deref().unwrap_or("-"),
                resolution.website.as_deref().unwrap_or("-"),
            );
            Ok(())
        }
    }
}

fn default_output_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("qualified_{stamp}.xlsx"))
}
